//! Cursor movement for keyboard navigation.

use crossterm::event::KeyCode;
use monty_hall::DoorCount;

/// Moves the door cursor based on arrow keys; stops at either end.
pub fn move_cursor(cursor: usize, key: KeyCode, door_count: DoorCount) -> usize {
    let last = door_count.get() - 1;
    match key {
        KeyCode::Left => cursor.saturating_sub(1),
        KeyCode::Right => (cursor + 1).min(last),
        KeyCode::Home => 0,
        KeyCode::End => last,
        _ => cursor.min(last),
    }
}

/// Maps a digit key to a door index: `1`-`9` are doors 1-9, `0` is door 10.
pub fn digit_door(c: char, door_count: DoorCount) -> Option<usize> {
    let index = match c.to_digit(10)? {
        0 => 9,
        d => d as usize - 1,
    };
    (index < door_count.get()).then_some(index)
}
