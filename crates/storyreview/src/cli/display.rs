//! Display formatting utilities for CLI output

use colored::*;
use serde_json::Value;

use crate::server::models::story::ProjectedStory;
use crate::server::types::ReviewResponse;

const SUMMARY_COLUMN_WIDTH: usize = 48;
const HEADERS: [&str; 4] = ["ID", "Summary", "Project", "Priority"];

/// Wrap text to fit within a specified width, splitting words longer than the width
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
  let width = width.max(1);
  let mut lines = Vec::new();

  for paragraph in text.split('\n') {
    if paragraph.trim().is_empty() {
      lines.push(String::new());
      continue;
    }

    let mut current_line = String::new();
    for word in paragraph.split_whitespace() {
      for piece in split_long_word(word, width) {
        let fits = current_line.chars().count() + 1 + piece.chars().count() <= width;
        if current_line.is_empty() {
          current_line = piece;
        } else if fits {
          current_line.push(' ');
          current_line.push_str(&piece);
        } else {
          lines.push(std::mem::replace(&mut current_line, piece));
        }
      }
    }

    if !current_line.is_empty() {
      lines.push(current_line);
    }
  }

  lines
}

fn split_long_word(word: &str, width: usize) -> Vec<String> {
  let chars: Vec<char> = word.chars().collect();
  chars.chunks(width).map(|chunk| chunk.iter().collect()).collect()
}

/// Table text for a stored field of any type
fn cell_text(value: &Value) -> String {
  match value {
    Value::Null => String::new(),
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

fn pad(text: &str, width: usize) -> String {
  format!("{text:<width$}")
}

/// Render related stories as a four-column table with wrapped summaries
pub fn render_table(stories: &[ProjectedStory]) -> String {
  let rows: Vec<[Vec<String>; 4]> = stories
    .iter()
    .map(|story| {
      [
        vec![story.story_id.clone()],
        wrap_text(&cell_text(&story.summary), SUMMARY_COLUMN_WIDTH),
        vec![cell_text(&story.project_name)],
        vec![cell_text(&story.priority)],
      ]
    })
    .collect();

  let mut widths = HEADERS.map(|header| header.chars().count());
  for row in &rows {
    for (column, cell) in row.iter().enumerate() {
      for line in cell {
        widths[column] = widths[column].max(line.chars().count());
      }
    }
  }

  let mut lines = Vec::new();
  let header: Vec<String> =
    HEADERS.iter().zip(widths).map(|(title, width)| pad(title, width)).collect();
  lines.push(header.join(" | ").bold().to_string());
  lines.push(widths.map(|width| "-".repeat(width)).join("-+-"));

  for row in &rows {
    let height = row.iter().map(Vec::len).max().unwrap_or(1).max(1);
    for line_index in 0..height {
      let cells: Vec<String> = row
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad(cell.get(line_index).map(String::as_str).unwrap_or(""), width))
        .collect();
      lines.push(cells.join(" | ").trim_end().to_string());
    }
  }

  lines.join("\n")
}

/// Render a successful review: the narrative verbatim, then the related stories
pub fn render_review(response: &ReviewResponse) -> String {
  let mut sections = Vec::new();

  if !response.review_summary.is_empty() {
    sections.push(format!("{}\n\n{}", "Review Summary".blue().bold(), response.review_summary));
  }

  if !response.related_stories.is_empty() {
    sections.push(format!(
      "{}\n\n{}",
      "Related Stories".blue().bold(),
      render_table(&response.related_stories)
    ));
  }

  sections.join("\n\n")
}

pub fn render_error(message: &str) -> String {
  format!("{} {}", "Error:".red().bold(), message.red())
}
