use crate::terminal::Terminal;
use crossterm::style::Color;

const BORDER: Color = Color::White;
const TEXT: Color = Color::Grey;
const BACKDROP: Color = Color::Black;

/// Render a centered help overlay box into the back buffer.
pub fn render_help_overlay(term: &mut Terminal, help_text: &str) {
    if help_text.is_empty() {
        return;
    }
    let (width, height) = term.size();

    let lines: Vec<&str> = help_text.lines().collect();
    let max_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let box_width = max_width + 4; // 2 chars padding each side
    let box_height = lines.len() + 2;

    let x0 = ((width as usize).saturating_sub(box_width) / 2) as i32;
    let y0 = ((height as usize).saturating_sub(box_height) / 2) as i32;
    let x1 = x0 + box_width as i32 - 1;
    let y1 = y0 + box_height as i32 - 1;

    border(term, x0, y0, '┌');
    border(term, x1, y0, '┐');
    border(term, x0, y1, '└');
    border(term, x1, y1, '┘');
    for x in x0 + 1..x1 {
        border(term, x, y0, '─');
        border(term, x, y1, '─');
    }

    for (i, line) in lines.iter().enumerate() {
        let y = y0 + 1 + i as i32;
        border(term, x0, y, '│');
        let padding = max_width.saturating_sub(line.chars().count());
        let padded = format!(" {}{} ", line, " ".repeat(padding));
        term.set_str(x0 + 1, y, &padded, Some(TEXT), Some(BACKDROP));
        border(term, x1, y, '│');
    }
}

fn border(term: &mut Terminal, x: i32, y: i32, ch: char) {
    term.set(x, y, ch, Some(BORDER), Some(BACKDROP));
}

#[cfg(test)]
mod tests {
    use super::render_help_overlay;
    use crate::terminal::Terminal;

    #[test]
    fn overlay_is_centered_and_boxed() {
        let mut term = Terminal::headless(20, 7);
        render_help_overlay(&mut term, "q  Quit\n?  Help");

        // 7 wide content + 4 padding = 11 columns, 4 rows
        let corner = term.cell(4, 1).expect("in bounds");
        assert_eq!(corner.ch, '┌');
        assert_eq!(term.cell(14, 4).expect("in bounds").ch, '┘');
        assert_eq!(term.cell(6, 2).expect("in bounds").ch, 'q');
    }

    #[test]
    fn empty_text_draws_nothing() {
        let mut term = Terminal::headless(10, 5);
        render_help_overlay(&mut term, "");
        assert_eq!(term.cell(5, 2).expect("in bounds").ch, ' ');
    }
}
