use egui::{Context, Event, PointerButton, Pos2, Rect, TouchPhase};

/// Which part of an interaction a raw sample belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplePhase {
    /// Pointer pressed or touch started
    Begin,
    /// Pointer or touch moved
    Move,
    /// Pointer released or touch lifted
    End,
    /// Pointer left the surface or the touch was cancelled
    Leave,
}

/// One raw pointer or touch sample in absolute (screen) coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputSample {
    Pointer { phase: SamplePhase, pos: Pos2 },
    Touch { id: u64, phase: SamplePhase, pos: Pos2 },
}

/// Source-independent input for the stroke state machine, in surface-local
/// coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeInput {
    Begin(Pos2),
    Move(Pos2),
    End,
}

/// Converts pointer and touch samples into surface-local stroke input.
///
/// Only one touch is followed at a time: the first touch to start is tracked
/// until it ends or is cancelled, and every other touch is ignored meanwhile.
#[derive(Debug, Clone, Default)]
pub struct PositionSampler {
    origin: Pos2,
    tracked_touch: Option<u64>,
}

impl PositionSampler {
    pub fn new(origin: Pos2) -> Self {
        Self {
            origin,
            tracked_touch: None,
        }
    }

    /// Update the on-screen origin of the surface (e.g. after layout changes)
    pub fn set_origin(&mut self, origin: Pos2) {
        self.origin = origin;
    }

    /// Absolute position to surface-local position
    pub fn to_local(&self, absolute: Pos2) -> Pos2 {
        (absolute - self.origin).to_pos2()
    }

    pub fn sample(&mut self, sample: InputSample) -> Option<StrokeInput> {
        match sample {
            InputSample::Pointer { phase, pos } => Some(self.classify(phase, pos)),
            InputSample::Touch { id, phase, pos } => {
                match (self.tracked_touch, phase) {
                    (None, SamplePhase::Begin) => {
                        self.tracked_touch = Some(id);
                        Some(self.classify(phase, pos))
                    }
                    (Some(tracked), SamplePhase::End | SamplePhase::Leave) if tracked == id => {
                        self.tracked_touch = None;
                        Some(StrokeInput::End)
                    }
                    (Some(tracked), SamplePhase::Move) if tracked == id => {
                        Some(self.classify(phase, pos))
                    }
                    _ => None,
                }
            }
        }
    }

    fn classify(&self, phase: SamplePhase, pos: Pos2) -> StrokeInput {
        match phase {
            SamplePhase::Begin => StrokeInput::Begin(self.to_local(pos)),
            SamplePhase::Move => StrokeInput::Move(self.to_local(pos)),
            SamplePhase::End | SamplePhase::Leave => StrokeInput::End,
        }
    }
}

/// Handles converting raw egui input into [`InputSample`]s for the surface
#[derive(Debug, Default)]
pub struct InputHandler {
    pointer_inside: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process this frame's raw egui events for a surface occupying
    /// `surface_rect`.
    ///
    /// Browsers report a touch both as touch events and as an emulated
    /// pointer; when a frame carries touch events its pointer events are
    /// dropped so each contact is seen once.
    pub fn process_input(&mut self, ctx: &Context, surface_rect: Rect) -> Vec<InputSample> {
        ctx.input(|input| self.translate(&input.events, surface_rect))
    }

    pub fn translate(&mut self, events: &[Event], surface_rect: Rect) -> Vec<InputSample> {
        let has_touch = events.iter().any(|event| matches!(event, Event::Touch { .. }));
        let mut samples = Vec::new();

        for event in events {
            match event {
                Event::Touch { id, phase, pos, .. } => {
                    let phase = match phase {
                        TouchPhase::Start if surface_rect.contains(*pos) => SamplePhase::Begin,
                        TouchPhase::Start => continue,
                        TouchPhase::Move => SamplePhase::Move,
                        TouchPhase::End => SamplePhase::End,
                        TouchPhase::Cancel => SamplePhase::Leave,
                    };
                    samples.push(InputSample::Touch {
                        id: id.0,
                        phase,
                        pos: *pos,
                    });
                }
                _ if has_touch => {}
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed,
                    ..
                } => {
                    if *pressed {
                        if surface_rect.contains(*pos) {
                            self.pointer_inside = true;
                            samples.push(InputSample::Pointer {
                                phase: SamplePhase::Begin,
                                pos: *pos,
                            });
                        }
                    } else {
                        samples.push(InputSample::Pointer {
                            phase: SamplePhase::End,
                            pos: *pos,
                        });
                    }
                }
                Event::PointerMoved(pos) => {
                    let inside = surface_rect.contains(*pos);
                    if inside {
                        samples.push(InputSample::Pointer {
                            phase: SamplePhase::Move,
                            pos: *pos,
                        });
                    } else if self.pointer_inside {
                        samples.push(InputSample::Pointer {
                            phase: SamplePhase::Leave,
                            pos: *pos,
                        });
                    }
                    self.pointer_inside = inside;
                }
                Event::PointerGone => {
                    if self.pointer_inside {
                        samples.push(InputSample::Pointer {
                            phase: SamplePhase::Leave,
                            pos: surface_rect.min,
                        });
                    }
                    self.pointer_inside = false;
                }
                _ => {}
            }
        }

        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Modifiers, TouchDeviceId, TouchId, pos2};

    fn touch(id: u64, phase: TouchPhase, pos: Pos2) -> Event {
        Event::Touch {
            device_id: TouchDeviceId(0),
            id: TouchId(id),
            phase,
            pos,
            force: None,
        }
    }

    #[test]
    fn test_pointer_positions_are_surface_local() {
        let mut sampler = PositionSampler::new(pos2(100.0, 50.0));
        let begin = sampler.sample(InputSample::Pointer {
            phase: SamplePhase::Begin,
            pos: pos2(110.0, 75.0),
        });
        assert_eq!(begin, Some(StrokeInput::Begin(pos2(10.0, 25.0))));

        let end = sampler.sample(InputSample::Pointer {
            phase: SamplePhase::Leave,
            pos: pos2(0.0, 0.0),
        });
        assert_eq!(end, Some(StrokeInput::End));
    }

    #[test]
    fn test_only_first_touch_is_followed() {
        let mut sampler = PositionSampler::new(Pos2::ZERO);
        let first = InputSample::Touch { id: 7, phase: SamplePhase::Begin, pos: pos2(1.0, 1.0) };
        let second = InputSample::Touch { id: 9, phase: SamplePhase::Begin, pos: pos2(5.0, 5.0) };
        assert_eq!(sampler.sample(first), Some(StrokeInput::Begin(pos2(1.0, 1.0))));
        assert_eq!(sampler.sample(second), None);

        let other_move = InputSample::Touch { id: 9, phase: SamplePhase::Move, pos: pos2(6.0, 6.0) };
        assert_eq!(sampler.sample(other_move), None);
        let other_end = InputSample::Touch { id: 9, phase: SamplePhase::End, pos: pos2(6.0, 6.0) };
        assert_eq!(sampler.sample(other_end), None);

        let tracked_move = InputSample::Touch { id: 7, phase: SamplePhase::Move, pos: pos2(2.0, 3.0) };
        assert_eq!(sampler.sample(tracked_move), Some(StrokeInput::Move(pos2(2.0, 3.0))));
        let cancel = InputSample::Touch { id: 7, phase: SamplePhase::Leave, pos: pos2(2.0, 3.0) };
        assert_eq!(sampler.sample(cancel), Some(StrokeInput::End));

        // After the tracked touch is gone a new touch may start a stroke
        let again = InputSample::Touch { id: 9, phase: SamplePhase::Begin, pos: pos2(4.0, 4.0) };
        assert_eq!(sampler.sample(again), Some(StrokeInput::Begin(pos2(4.0, 4.0))));
    }

    #[test]
    fn test_handler_reports_leave_when_pointer_exits() {
        let rect = Rect::from_min_size(pos2(10.0, 10.0), egui::vec2(100.0, 100.0));
        let mut handler = InputHandler::new();
        let events = vec![
            Event::PointerButton {
                pos: pos2(20.0, 20.0),
                button: PointerButton::Primary,
                pressed: true,
                modifiers: Modifiers::NONE,
            },
            Event::PointerMoved(pos2(30.0, 30.0)),
            Event::PointerMoved(pos2(300.0, 30.0)),
            Event::PointerMoved(pos2(400.0, 30.0)),
        ];
        let phases: Vec<_> = handler
            .translate(&events, rect)
            .into_iter()
            .map(|sample| match sample {
                InputSample::Pointer { phase, .. } => phase,
                InputSample::Touch { phase, .. } => phase,
            })
            .collect();
        assert_eq!(phases, vec![SamplePhase::Begin, SamplePhase::Move, SamplePhase::Leave]);
    }

    #[test]
    fn test_handler_ignores_press_outside_surface() {
        let rect = Rect::from_min_size(Pos2::ZERO, egui::vec2(50.0, 50.0));
        let mut handler = InputHandler::new();
        let events = vec![Event::PointerButton {
            pos: pos2(80.0, 10.0),
            button: PointerButton::Primary,
            pressed: true,
            modifiers: Modifiers::NONE,
        }];
        assert!(handler.translate(&events, rect).is_empty());
    }

    #[test]
    fn test_handler_prefers_touch_over_emulated_pointer() {
        let rect = Rect::from_min_size(Pos2::ZERO, egui::vec2(50.0, 50.0));
        let mut handler = InputHandler::new();
        let events = vec![
            Event::PointerMoved(pos2(5.0, 5.0)),
            Event::PointerButton {
                pos: pos2(5.0, 5.0),
                button: PointerButton::Primary,
                pressed: true,
                modifiers: Modifiers::NONE,
            },
            touch(3, TouchPhase::Start, pos2(5.0, 5.0)),
        ];
        let samples = handler.translate(&events, rect);
        assert_eq!(
            samples,
            vec![InputSample::Touch { id: 3, phase: SamplePhase::Begin, pos: pos2(5.0, 5.0) }]
        );
    }
}
