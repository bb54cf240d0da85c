pub mod widget_layout_repo;

pub use widget_layout_repo::WidgetLayoutRepo;
