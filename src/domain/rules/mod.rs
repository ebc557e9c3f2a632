// Domain rules - Translation of edit parameters into engine arguments

use crate::domain::model::*;

/// Fixed 3x3 channel mix producing a sepia tone
pub const SEPIA_FILTER: &str =
    "colorchannelmixer=.393:.769:.189:0:.349:.686:.168:0:.272:.534:.131";

/// Encoder preset used whenever the clip is re-encoded
pub const REENCODE_PRESET: &str = "ultrafast";

/// Compiles edit parameters into the engine's argument list
///
/// The engine applies filters in the order given and reads flags pairwise,
/// so the token order produced here is part of the contract:
///
/// 1. `-i input.mp4`
/// 2. `-ss <start> -to <end>` when the trim range is narrower than the source
/// 3. `-c copy` when no visual filter is active, otherwise `-vf`, `-af` and
///    `-preset ultrafast`
/// 4. `output.mp4`
pub struct ParameterCompiler;

impl ParameterCompiler {
    /// Compile `params` for a source of `duration` seconds
    pub fn compile(params: &EditParameters, duration: f64) -> CommandArguments {
        let mut args = CommandArguments::new();
        args.push_pair("-i", INPUT_FILE);

        if params.is_strict_subrange(duration) {
            args.push_pair("-ss", format_seconds(params.trim_start));
            args.push_pair("-to", format_seconds(params.trim_end));
        }

        if !params.has_visual_filters() {
            args.push_pair("-c", "copy");
        } else {
            let chains = FilterChains::build(params);
            if !chains.video.is_empty() {
                args.push_pair("-vf", chains.video.join(","));
            }
            if !chains.audio.is_empty() {
                args.push_pair("-af", chains.audio.join(","));
            }
            args.push_pair("-preset", REENCODE_PRESET);
        }

        args.push(OUTPUT_FILE);
        args
    }
}

/// Video and audio filter chains in application order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterChains {
    pub video: Vec<String>,
    pub audio: Vec<String>,
}

impl FilterChains {
    pub fn build(params: &EditParameters) -> Self {
        let mut chains = Self::default();

        if params.blur_amount > 0 {
            chains.video.push(format!("boxblur={}:1", params.blur_amount));
        }
        if params.grayscale {
            chains.video.push("hue=s=0".to_string());
        }
        if params.sepia {
            chains.video.push(SEPIA_FILTER.to_string());
        }
        if params.has_color_adjustment() {
            chains.video.push(format!(
                "eq=brightness={}:contrast={}",
                format_decimal(params.brightness),
                format_decimal(params.contrast)
            ));
        }
        if params.invert {
            chains.video.push("negate".to_string());
        }
        if let Some(transpose) = transpose_filter(params.rotation) {
            chains.video.push(transpose.to_string());
        }
        // Reversing only one stream desynchronises the output.
        if params.reverse {
            chains.video.push("reverse".to_string());
            chains.audio.push("areverse".to_string());
        }

        chains
    }
}

fn transpose_filter(rotation: Rotation) -> Option<&'static str> {
    match rotation {
        Rotation::None => None,
        Rotation::Quarter => Some("transpose=1"),
        Rotation::Half => Some("transpose=1,transpose=1"),
        Rotation::ThreeQuarters => Some("transpose=2"),
    }
}

/// Shortest decimal rendering (`2.5`, `10`, `0.3`)
pub fn format_decimal(value: f64) -> String {
    if value == 0.0 {
        // avoid "-0"
        return "0".to_string();
    }
    format!("{}", value)
}

/// Decimal seconds without frame-accurate rounding
pub fn format_seconds(seconds: f64) -> String {
    format_decimal(seconds)
}
