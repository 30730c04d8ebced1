pub mod entry_form;
pub mod map_view;
pub mod workout_list;
