// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Prompts for structured layout generation.

/// Used by [`generate`](crate::ClaudeClient::generate) when no system prompt is given.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant that generates structured \
layout descriptions for 3D scenes. Your task is to convert the user's text description into a \
structured format that can be used to create a 3D visualization.";

/// Lists every phrase the rule-based converter recognizes.
pub const LAYOUT_SYSTEM_PROMPT: &str = r#"You convert natural language descriptions of buildings, houses and rooms into structured layout descriptions. Use only the following phrase forms, one per line:

# Basic elements
1. Walls: "wall from (x1,y1,z1) to (x2,y2,z2) with height h and thickness t"
2. Doors: "door on wall N at position (x,y,z) with width w and height h"
3. Windows: "window on wall N at position (x,y,z) with width w and height h"
4. Objects: "a [object_name] at position (x,y,z) with angle a and scale (sx,sy,sz)"

# Floors and rooms
5. Floors: "floor N at height h with dimensions (width, length)"
6. Rooms: "room [room_name] on floor N with dimensions (width, length) connected to [other_room] via [connection_type]"

# Advanced objects
7. Architectural features: "a [feature_type] at position (x,y,z) with dimensions (w,l,h) and style [style]"
8. Built-ins: "a built-in [type] along wall N from position (x1,y1,z1) to (x2,y2,z2) with height h"
9. Fixtures: "a [fixture_type] at position (x,y,z) facing direction d with dimensions (w,l,h)"

Where:
- Coordinates and sizes are in meters
- Wall N is the Nth wall defined on the same floor, starting from 0
- Floor N is the storey number, 0 being the ground floor
- Angles are in radians
- Connection types include "door", "opening" and "archway"
- Directions are "north", "south", "east", "west" or an angle in radians
- Object, room and style names are single words; use underscores instead of spaces

Reply ONLY with these structured lines, no explanations. Use reasonable defaults for anything the description leaves out.

Organize multi-floor or multi-room layouts by floor and then by room, using comment lines starting with # as section headers:

# Ground Floor
floor 0 at height 0 with dimensions (10, 15)
room living_room on floor 0 with dimensions (5, 7) connected to kitchen via opening
wall from (0,0,0) to (5,0,0) with height 2.8 and thickness 0.2
wall from (5,0,0) to (5,7,0) with height 2.8 and thickness 0.2
window on wall 0 at position (2.5,0,1.0) with width 1.5 and height 1.0
a sofa at position (2.5,6,0) with angle 3.14 and scale (2.0,0.8,0.8)
a built-in cabinet along wall 1 from position (5,1,0) to (5,3,0) with height 2.0
"#;

/// User message asking for `text` to be converted.
pub fn layout_prompt(text: &str) -> String {
    format!(
        "Please convert the following description into a structured layout format:\n\n\
         {}\n\n\
         Remember to follow the specified format exactly, with one structure per line.",
        text.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_prompt_embeds_text() {
        let prompt = layout_prompt("  a small studio with one window \n");
        assert!(prompt.contains("\n\na small studio with one window\n\n"));
    }

    #[test]
    fn test_system_prompt_examples_are_recognized() {
        let layout = arclayout_core::TextToLayout::new().generate_layout(LAYOUT_SYSTEM_PROMPT);
        assert!(layout.walls.len() >= 2);
        assert!(!layout.windows.is_empty());
        assert!(layout.bboxes.iter().any(|b| b.class_name == "sofa"));
        assert!(layout.bboxes.iter().any(|b| b.class_name == "cabinet"));
    }
}
