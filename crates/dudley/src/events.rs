/// Requests arriving from the background services.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    SetDiameter(f64),
    Start,
    Stop,
    ConfigReload,
}
