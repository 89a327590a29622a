//! TUI widgets for the gift

pub mod gallery;
pub mod mosaic;
pub mod save_menu;
pub mod status_bar;
pub mod toast;

pub use gallery::GalleryWidget;
pub use mosaic::MosaicWidget;
pub use save_menu::{SaveChoice, SaveMenuWidget};
pub use status_bar::StatusBarWidget;
pub use toast::ToastWidget;
