//! Property tests for line assembly and parameter extraction

use linpos_protocol::{extract_param, parse, Command, LineAssembler, ModalState, PositioningMode};
use proptest::prelude::*;

fn modal(mode: PositioningMode, target: f32) -> ModalState {
    ModalState {
        mode,
        target,
        feedrate: 100.0,
    }
}

proptest! {
    #[test]
    fn extract_param_reads_numeric_run(
        number in "-?[0-9]{1,6}(\\.[0-9]{1,4})?",
        letter in prop::sample::select(vec!['X', 'F']),
        suffix in "[ A-EG-WYZ;]{0,6}",
        default in -1000.0f32..1000.0,
    ) {
        let line = format!("G1 {}{}{}", letter, number, suffix);
        let expected: f32 = number.parse().unwrap();
        prop_assert_eq!(extract_param(&line, letter, default), expected);
    }

    #[test]
    fn extract_param_without_letter_is_default(
        body in "[ 0-9A-WYZ.\\-]{0,40}",
        default in -1000.0f32..1000.0,
    ) {
        prop_assert_eq!(extract_param(&body, 'X', default), default);
    }

    #[test]
    fn relative_rapid_without_x_is_zero_delta(target in 0.0f32..100.0) {
        let cmd = parse("G0", &modal(PositioningMode::Relative, target));
        prop_assert_eq!(cmd, Command::MoveRelative { x: 0.0 });
    }

    #[test]
    fn absolute_rapid_without_x_keeps_target(target in 0.0f32..100.0) {
        let cmd = parse("G0", &modal(PositioningMode::Absolute, target));
        prop_assert_eq!(cmd, Command::MoveAbsolute { x: target });
    }

    #[test]
    fn assembler_emits_one_line_per_terminated_command(
        commands in prop::collection::vec("[A-Z0-9 .\\-]{0,30}", 0..10),
    ) {
        let mut assembler = LineAssembler::new();
        let mut emitted = Vec::new();

        for command in &commands {
            for ch in command.chars().chain(std::iter::once('\n')) {
                if let Some(line) = assembler.feed(ch) {
                    emitted.push(line);
                }
            }
        }

        let expected: Vec<&str> = commands
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();
        let emitted: Vec<&str> = emitted.iter().map(|l| l.as_str()).collect();
        prop_assert_eq!(emitted, expected);
    }
}
