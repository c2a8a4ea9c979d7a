mod surface;

pub use surface::TerminalSurface;
