mod global_footer;
mod key_hints;
mod markdown;
mod step_detail;
mod step_list;
mod tab_bar;
mod trace_unavailable;
mod transport_bar;

pub use global_footer::{FooterContext, GlobalFooter};
pub use key_hints::{render_key_hints, KeyHintBarStyle};
pub use markdown::MarkdownRenderer;
pub use step_detail::StepDetail;
pub use step_list::StepList;
pub use tab_bar::TabBar;
pub use trace_unavailable::TraceUnavailable;
pub use transport_bar::TransportBar;

use ratatui::style::Color;

// Palette shared by the viewer components
pub const ACCENT_PRIMARY: Color = Color::Cyan;
pub const ACCENT_SUCCESS: Color = Color::Green;
pub const ACCENT_WARNING: Color = Color::Yellow;
pub const ACCENT_ERROR: Color = Color::Red;
pub const TEXT_PRIMARY: Color = Color::White;
pub const TEXT_SECONDARY: Color = Color::Gray;
pub const TEXT_MUTED: Color = Color::DarkGray;
pub const BG_BAR: Color = Color::Rgb(20, 20, 20);
pub const BG_KEY_HINT: Color = Color::Rgb(45, 45, 45);
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 48, 60);
