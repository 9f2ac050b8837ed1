/// egui rendering. Everything here reads from and writes to
/// [`crate::state::AppState`]; no scoring happens in the UI.
pub mod panels;
pub mod plot;
pub mod table;
