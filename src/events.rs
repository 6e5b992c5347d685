#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    SetValue(f64),
    ConfigReload,
}
