use crate::paper::Block;

const PAGE_WIDTH: usize = 72;

/// Plain-text rendering of a block sequence: headings are centered, lines
/// carry their running "Q.n" prefix, and output is cut into pages of at
/// most `lines_per_page` rows.
pub(crate) fn paginate(
    title: &str,
    subtitle: &str,
    blocks: &[Block],
    lines_per_page: usize,
) -> Vec<Vec<String>> {
    let budget = lines_per_page.max(1);
    let mut pages = Vec::new();
    let mut page = Vec::new();

    let mut push_line = |pages: &mut Vec<Vec<String>>, page: &mut Vec<String>, line: String| {
        if page.len() == budget {
            pages.push(std::mem::take(page));
        }
        page.push(line);
    };

    push_line(&mut pages, &mut page, center(title));
    if !subtitle.is_empty() {
        push_line(&mut pages, &mut page, center(subtitle));
    }
    push_line(&mut pages, &mut page, "-".repeat(PAGE_WIDTH));
    push_line(&mut pages, &mut page, String::new());

    for block in blocks {
        let line = match block {
            Block::Heading { text } => center(text),
            Block::Line { number, text } => format!("Q.{number} {text}"),
            Block::Note { text } => text.clone(),
            Block::Spacer => String::new(),
        };
        push_line(&mut pages, &mut page, line);
    }

    if !page.is_empty() {
        pages.push(page);
    }
    pages
}

fn center(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.len() >= PAGE_WIDTH {
        return trimmed.to_string();
    }
    let padding = (PAGE_WIDTH - trimmed.len()) / 2;
    format!("{}{}", " ".repeat(padding), trimmed)
}
