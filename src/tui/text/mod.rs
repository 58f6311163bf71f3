//! Text utilities: Markdown parsing, math layout and line wrapping for the answer display.

mod markdown;
mod math;
mod wrap;

pub(crate) use math::styled_lines;
pub(crate) use wrap::wrap_message;

#[cfg(test)]
mod tests;
