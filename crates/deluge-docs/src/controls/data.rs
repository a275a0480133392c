//! The Deluge's buttons, knobs and pads.
//!
//! The table order is the conventional order for naming controls in a chord.

use super::{Control, ControlTable};

/// Build the built-in table.
///
/// # Panics
///
/// Panics if two built-in controls share a name or alias.
pub(super) fn deluge_table() -> ControlTable {
    ControlTable::new(deluge_controls()).expect("built-in control names are unique")
}

fn deluge_controls() -> Vec<Control> {
    vec![
        // Buttons
        Control::button("Shift"),
        Control::button("AffectEntire")
            .display("Affect Entire")
            .did_you_mean(&["AffectAll", "Affect", "Entire", "All", "Affect_Entire"]),
        Control::button("Clip"),
        Control::button("CrossScreen")
            .display("Cross Screen")
            .did_you_mean(&["Cross", "Screen", "Cross_Screen"]),
        Control::button("CV"),
        Control::icon_button("Keyboard", "button-keyboard").did_you_mean(&["Keys"]),
        Control::button("Kit"),
        Control::button("Load").did_you_mean(&["New"]),
        Control::button("MIDI"),
        Control::button("Record").did_you_mean(&["Rec"]),
        Control::button("Play"),
        Control::button("Save").did_you_mean(&["Delete"]),
        Control::button("Scale"),
        Control::button("Song"),
        Control::button("SyncScaling")
            .display("Sync Scaling")
            .did_you_mean(&["Sync", "Scaling", "Sync_Scaling"]),
        Control::button("Synth"),
        Control::button("TapTempo")
            .display("Tap Tempo")
            .did_you_mean(&["Tap", "Tempo", "Tap_Tempo"]),
        Control::button("TripletsView")
            .display("Triplets View")
            .did_you_mean(&["Triplets", "View", "Triplets_View"]),
        Control::button("Learn"),
        Control::button("Input"),
        Control::button("LearnInput")
            .display("Learn/Input")
            .did_you_mean(&["Learn/Input", "Learn_Input"]),
        Control::button("Back"),
        Control::button("Undo").did_you_mean(&["Redo"]),
        Control::button("BackUndo")
            .display("Back/Undo")
            .did_you_mean(&["Back/Undo", "Back_Undo"]),
        Control::button("Param").aliases(&["Parameter"]),
        // Knobs
        Control::knob("Horizontal"),
        Control::knob("Vertical"),
        Control::knob("Select"),
        Control::knob("Tempo"),
        Control::paired_knob("Gold"),
        // Pads
        Control::pad("Pad"),
    ]
}
