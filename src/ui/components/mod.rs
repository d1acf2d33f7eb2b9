pub mod menu;
pub mod milestones;
pub mod progress_bar;
pub mod results;
pub mod typing_area;
