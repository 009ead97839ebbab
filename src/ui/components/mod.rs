pub mod box_board;
pub mod card_panel;
pub mod deck_input;
pub mod progress_bar;
pub mod stats_panel;
pub mod toast;
