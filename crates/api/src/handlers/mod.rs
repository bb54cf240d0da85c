pub mod platforms;
pub mod widgets;
