//! Example: Drag once around the RGB ring of the first registered device.
//!
//! Run with: `DIMMER_PANEL_URL=http://localhost:8080 cargo run --example drag_ring`

use dimmer_panel::{
    ControlPanel, HttpTransport, LightMode, PanelConfig, PanelError, PickerSample,
    PointerPosition,
};

fn main() -> Result<(), PanelError> {
    // Initialize logging (optional)
    env_logger::init();

    let config = PanelConfig::from_env();
    println!("Connecting to {}...", config.base_url);
    let mut panel = ControlPanel::new(HttpTransport::new(&config)?, &config)?;

    let count = panel.reload()?;
    if let Some(notice) = panel.list_notice() {
        println!("{}", notice);
    }
    println!("{} device(s) registered", count);

    let devices: Vec<(String, String)> = panel
        .registry()
        .sorted()
        .into_iter()
        .map(|r| (r.address.clone(), r.name.clone()))
        .collect();
    for (address, name) in &devices {
        if let Some(badge) = panel.badge(address) {
            println!("  {} [{}]: light={}, fan={}", name, address, badge.light, badge.fan);
        }
    }

    let Some((address, name)) = devices.first() else {
        return Ok(());
    };
    println!("Opening {}", name);
    panel.open_device(address)?;
    panel.select_mode(LightMode::Rgb);

    // Half-radius circle: full saturation, hue sweeping once around
    let radius = config.ring_radius * 0.5;
    panel.press(PointerPosition::new(radius, 0.0));
    for step in 1..=20 {
        let angle = f64::from(step) / 20.0 * std::f64::consts::TAU;
        let pos = PointerPosition::new(radius * angle.cos(), radius * angle.sin());
        if let Some(PickerSample::Ring(sample)) = panel.drag(pos) {
            println!(
                "hue={:3} brightness={:3} color={}",
                sample.value.hue,
                sample.value.brightness,
                sample.color.to_hex()
            );
        }
    }
    panel.release();

    match panel.status() {
        Some(status) => println!("{}", status.text),
        None => println!("No status"),
    }

    Ok(())
}
