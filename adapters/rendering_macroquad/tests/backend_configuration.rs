use chronolife_rendering_macroquad::MacroquadBackend;

#[test]
fn vsync_toggle_maps_onto_swap_interval() {
    let enabled = format!("{:?}", MacroquadBackend::new().with_vsync(true));
    let disabled = format!("{:?}", MacroquadBackend::new().with_vsync(false));

    assert!(enabled.contains("swap_interval: Some(1)"), "{enabled}");
    assert!(disabled.contains("swap_interval: Some(0)"), "{disabled}");
}

#[test]
fn default_backend_defers_to_platform_and_stays_quiet() {
    let backend = format!("{:?}", MacroquadBackend::default());

    assert!(backend.contains("swap_interval: None"), "{backend}");
    assert!(backend.contains("show_fps: false"), "{backend}");
}

#[test]
fn explicit_swap_interval_overrides_vsync() {
    let backend = MacroquadBackend::new()
        .with_vsync(true)
        .with_swap_interval(Some(2))
        .with_show_fps(true);
    let rendered = format!("{backend:?}");

    assert!(rendered.contains("swap_interval: Some(2)"), "{rendered}");
    assert!(rendered.contains("show_fps: true"), "{rendered}");
}
