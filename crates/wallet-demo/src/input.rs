#![forbid(unsafe_code)]

//! Crossterm to canonical event mapping.
//!
//! Terminal mice report button drags and bare motion separately, which maps
//! directly onto [`PointerEventKind::Move`] and [`PointerEventKind::Hover`].
//! Losing focus mid-gesture is reported as [`PointerEventKind::Cancel`].

use crossterm::event as ct;
use wallet_core::event::{
    Event, KeyCode, KeyEvent, Modifiers, PointerButton, PointerEvent, PointerEventKind,
};

/// A mapped terminal input.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Event(Event),
    /// Ctrl+C or Ctrl+Q.
    Quit,
}

/// Map one crossterm event. Returns `None` for input the wallet ignores.
#[must_use]
pub fn map_event(event: ct::Event) -> Option<Input> {
    match event {
        ct::Event::Key(key) => map_key_event(key),
        ct::Event::Mouse(mouse) => map_mouse_event(mouse).map(|p| Input::Event(Event::Pointer(p))),
        ct::Event::Resize(width, height) => Some(Input::Event(Event::Resize { width, height })),
        ct::Event::Paste(text) => Some(Input::Event(Event::Paste(text))),
        ct::Event::FocusLost => Some(Input::Event(Event::Pointer(PointerEvent::new(
            PointerEventKind::Cancel,
            0,
            0,
        )))),
        ct::Event::FocusGained => None,
    }
}

fn map_key_event(event: ct::KeyEvent) -> Option<Input> {
    if event.kind == ct::KeyEventKind::Release {
        return None;
    }
    let modifiers = map_modifiers(event.modifiers);
    if modifiers.contains(Modifiers::CTRL)
        && matches!(event.code, ct::KeyCode::Char('c' | 'q'))
    {
        return Some(Input::Quit);
    }
    let code = map_key_code(event.code)?;
    Some(Input::Event(Event::Key(
        KeyEvent::new(code).with_modifiers(modifiers),
    )))
}

fn map_key_code(code: ct::KeyCode) -> Option<KeyCode> {
    match code {
        ct::KeyCode::Char(c) => Some(KeyCode::Char(c)),
        ct::KeyCode::Enter => Some(KeyCode::Enter),
        ct::KeyCode::Esc => Some(KeyCode::Escape),
        ct::KeyCode::Backspace => Some(KeyCode::Backspace),
        ct::KeyCode::Tab | ct::KeyCode::BackTab => Some(KeyCode::Tab),
        ct::KeyCode::Delete => Some(KeyCode::Delete),
        ct::KeyCode::Up => Some(KeyCode::Up),
        ct::KeyCode::Down => Some(KeyCode::Down),
        ct::KeyCode::PageUp => Some(KeyCode::PageUp),
        ct::KeyCode::PageDown => Some(KeyCode::PageDown),
        _ => None,
    }
}

fn map_modifiers(modifiers: ct::KeyModifiers) -> Modifiers {
    let mut mapped = Modifiers::NONE;
    if modifiers.contains(ct::KeyModifiers::SHIFT) {
        mapped |= Modifiers::SHIFT;
    }
    if modifiers.contains(ct::KeyModifiers::ALT) {
        mapped |= Modifiers::ALT;
    }
    if modifiers.contains(ct::KeyModifiers::CONTROL) {
        mapped |= Modifiers::CTRL;
    }
    mapped
}

fn map_mouse_event(event: ct::MouseEvent) -> Option<PointerEvent> {
    let kind = match event.kind {
        ct::MouseEventKind::Down(button) => PointerEventKind::Down(map_button(button)),
        ct::MouseEventKind::Up(button) => PointerEventKind::Up(map_button(button)),
        ct::MouseEventKind::Drag(_) => PointerEventKind::Move,
        ct::MouseEventKind::Moved => PointerEventKind::Hover,
        ct::MouseEventKind::ScrollUp => PointerEventKind::Wheel(-1),
        ct::MouseEventKind::ScrollDown => PointerEventKind::Wheel(1),
        ct::MouseEventKind::ScrollLeft | ct::MouseEventKind::ScrollRight => return None,
    };
    let mut pointer = PointerEvent::new(kind, i32::from(event.column), i32::from(event.row));
    pointer.modifiers = map_modifiers(event.modifiers);
    Some(pointer)
}

fn map_button(button: ct::MouseButton) -> PointerButton {
    match button {
        ct::MouseButton::Left => PointerButton::Primary,
        ct::MouseButton::Right => PointerButton::Secondary,
        ct::MouseButton::Middle => PointerButton::Middle,
    }
}
