//! # Prompt
//!
//! Builds the instruction prompt sent to every LLM backend. The output only
//! depends on the arguments, so identical requests yield identical prompts.

use itertools::Itertools;

use crate::types::{LengthMode, SummaryOptions};

const PERSONA: &str = "You are a professional assistant that specializes in summarizing YouTube videos for busy business professionals that don't have time to watch them.";

const BASE_INSTRUCTIONS: [&str; 5] = [
    "1. Return the summary and only the summary, without any additional text.",
    "2. Merge repeated points and ideas into one point.",
    "3. Make the text easy to read - spacious, no long blocks of text. Use indentation with titles and subtitles for easy context.",
    "4. Remove any promotional or self-promotional content.",
    "5. Use markdown to format the text.",
];

pub const EXTRA_SHORT_INSTRUCTION: &str = "6. Write just one sentence per important key message.";
pub const NORMAL_LENGTH_INSTRUCTION: &str = "6. Keep it short (not more than 500 words, 300 words is preferred) and to the point but don't miss any important insights and messages the speaker is trying to convey.";

pub const CORE_INSTRUCTION: &str =
    "Start with a short paragraph summarizing the key messages in the video in 3-5 bullets.";
pub const SECTIONS_INSTRUCTION: &str =
    "Then provide a summary of key messages by section, providing timestamps for each section.";
pub const FALLBACK_INSTRUCTION: &str = "Provide a concise summary of the video.";

pub fn build_prompt(
    transcript: &str,
    include_core: bool,
    include_sections: bool,
    length_mode: LengthMode,
) -> String {
    let length_instruction = match length_mode {
        LengthMode::ExtraShort => EXTRA_SHORT_INSTRUCTION,
        LengthMode::Normal => NORMAL_LENGTH_INSTRUCTION,
    };
    let instructions = BASE_INSTRUCTIONS
        .iter()
        .chain([&length_instruction])
        .join("\n");

    let structure = [
        (include_core, CORE_INSTRUCTION),
        (include_sections, SECTIONS_INSTRUCTION),
        (!include_core && !include_sections, FALLBACK_INSTRUCTION),
    ]
    .into_iter()
    .filter_map(|(enabled, instruction)| enabled.then_some(instruction))
    .join("\n");

    format!(
        "{PERSONA}\n\n\
         A transcript will be provided below.\n\n\
         Provide a summary following these guidelines:\n\
         {instructions}\n\n\
         {structure}\n\n\
         Here is the transcript of the video:\n\n\
         \"{transcript}\"\n"
    )
}

/// [`build_prompt`] driven by a request's [`SummaryOptions`]
pub fn prompt_for(transcript: &str, options: &SummaryOptions) -> String {
    build_prompt(
        transcript,
        options.include_core,
        options.include_sections,
        options.length_mode,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRANSCRIPT: &str = "we talk about rust and then about tokio";

    fn position(prompt: &str, needle: &str) -> Option<usize> {
        prompt.find(needle)
    }

    #[test]
    fn test_every_toggle_combination() {
        for include_core in [true, false] {
            for include_sections in [true, false] {
                for length_mode in [LengthMode::Normal, LengthMode::ExtraShort] {
                    let prompt =
                        build_prompt(TRANSCRIPT, include_core, include_sections, length_mode);
                    let again =
                        build_prompt(TRANSCRIPT, include_core, include_sections, length_mode);
                    assert_eq!(prompt, again, "build_prompt must be deterministic");

                    let core = position(&prompt, CORE_INSTRUCTION);
                    let sections = position(&prompt, SECTIONS_INSTRUCTION);
                    let fallback = position(&prompt, FALLBACK_INSTRUCTION);

                    assert_eq!(core.is_some(), include_core);
                    assert_eq!(sections.is_some(), include_sections);
                    assert_eq!(fallback.is_some(), !include_core && !include_sections);
                    if let (Some(core), Some(sections)) = (core, sections) {
                        assert!(core < sections, "core summary must precede sections");
                    }

                    let (expected, unexpected) = match length_mode {
                        LengthMode::ExtraShort => {
                            (EXTRA_SHORT_INSTRUCTION, NORMAL_LENGTH_INSTRUCTION)
                        }
                        LengthMode::Normal => (NORMAL_LENGTH_INSTRUCTION, EXTRA_SHORT_INSTRUCTION),
                    };
                    assert!(prompt.contains(expected));
                    assert!(!prompt.contains(unexpected));
                }
            }
        }
    }

    #[test]
    fn test_instruction_order() {
        let prompt = build_prompt(TRANSCRIPT, true, true, LengthMode::Normal);

        let mut last = 0;
        for needle in BASE_INSTRUCTIONS
            .iter()
            .chain([&NORMAL_LENGTH_INSTRUCTION, &CORE_INSTRUCTION, &SECTIONS_INSTRUCTION])
        {
            let idx = position(&prompt, needle).expect("instruction missing from prompt");
            assert!(idx >= last, "instruction out of order: {needle}");
            last = idx;
        }

        let transcript_idx = position(&prompt, TRANSCRIPT).unwrap();
        assert!(transcript_idx > last, "transcript must come last");
    }

    #[test]
    fn test_preamble_and_transcript() {
        let prompt = build_prompt(TRANSCRIPT, false, false, LengthMode::ExtraShort);

        assert!(prompt.starts_with(PERSONA));
        assert!(prompt.contains("busy business professionals"));
        assert!(prompt.contains(&format!("\"{TRANSCRIPT}\"")));
    }

    #[test]
    fn test_prompt_for_matches_build_prompt() {
        let options = SummaryOptions {
            include_core: false,
            length_mode: LengthMode::ExtraShort,
            ..Default::default()
        };

        assert_eq!(
            prompt_for(TRANSCRIPT, &options),
            build_prompt(TRANSCRIPT, false, true, LengthMode::ExtraShort)
        );
    }
}
