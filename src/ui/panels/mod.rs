mod controls;

pub use controls::ControlPanel;
