pub mod widget_layout;
