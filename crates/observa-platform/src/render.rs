use std::fmt::Write;

use observa_core::{Font, FontWeight, Frame, FrameNode, NodeKind, SheetState, TextStyle};

fn style_suffix(style: &TextStyle) -> String {
    let mut parts = Vec::new();
    if style.font == Font::Title {
        parts.push("title".to_string());
    }
    if style.weight == FontWeight::Bold {
        parts.push("bold".to_string());
    }
    if let Some(c) = style.color {
        parts.push(c.to_string());
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" [{}]", parts.join(", "))
    }
}

fn percent(f: f32) -> String {
    format!("{:.1}%", f * 100.0)
}

fn line(node: &FrameNode) -> String {
    let marker = if node.interactive { "*" } else { "" };
    match &node.kind {
        NodeKind::Component { name } => format!("<{name}>"),
        NodeKind::Column => "Column".to_string(),
        NodeKind::Text { text, style } => format!("Text \"{text}\"{}", style_suffix(style)),
        NodeKind::Button { label } => format!("{marker}Button \"{label}\""),
        NodeKind::Stepper { label, value } => format!("{marker}Stepper \"{label}\" = {value}"),
        NodeKind::Frame { target, current } => {
            if (target - current).abs() < f32::EPSILON {
                format!("Frame height={}", percent(*current))
            } else {
                format!("Frame height={} -> {}", percent(*current), percent(*target))
            }
        }
        NodeKind::Sheet {
            state,
            detent,
            interactive_dismiss,
        } => {
            let state = match state {
                SheetState::Hidden => "hidden",
                SheetState::Shown => "shown",
            };
            let dismiss = if *interactive_dismiss { "" } else { ", no swipe dismiss" };
            format!("Sheet {state} (detent {}{dismiss})", percent(*detent))
        }
        NodeKind::Alert { title, actions } => {
            format!("{marker}Alert \"{title}\" [{}]", actions.join(" | "))
        }
    }
}

/// Render a frame as an indented outline. Interactive nodes are marked `*`.
pub fn render_text(frame: &Frame) -> String {
    let mut out = String::new();
    for node in &frame.nodes {
        let _ = writeln!(out, "{}{}", "  ".repeat(node.depth), line(node));
    }
    out
}
