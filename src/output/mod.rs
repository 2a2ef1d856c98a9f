//! Output formatting for CLI display
//!
//! This module formats rendered listing pages, redirect notices and tag
//! listings. Quiet mode drops decoration and prints one bare value per line.

use crate::item::{Item, ListingKind};
use colored::Colorize;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format one listed item
///
/// Papers show their tags, posts their author and comment count.
#[must_use]
pub fn item_line(item: &Item, quiet: bool) -> String {
    if quiet {
        return item.id.clone();
    }

    let date = item.created_at.format(DATE_FORMAT).to_string();
    let mut line = format!("  {} {}", date.dimmed(), item.title.bold());

    match item.kind {
        ListingKind::Papers => {
            let tags: Vec<&str> = item.tag_names().collect();
            if !tags.is_empty() {
                line.push_str(&format!(" [{}]", tags.join(", ").cyan()));
            }
        }
        ListingKind::Posts => {
            if let Some(author) = &item.author {
                line.push_str(&format!(" by {}", author.green()));
            }
            if !item.comments.is_empty() {
                line.push_str(&format!(" ({} comment(s))", item.comments.len()));
            }
        }
    }

    line
}

/// Footer shown under a rendered page
#[must_use]
pub fn page_footer(current_page: u64, total_pages: u64) -> String {
    format!("Page {current_page} of {total_pages}").dimmed().to_string()
}

/// Message for a request that matched nothing
#[must_use]
pub fn empty_message(kind: ListingKind) -> String {
    format!("No {kind} match the given search and tags.").yellow().to_string()
}

/// Notice printed when a request was redirected to its canonical page
#[must_use]
pub fn redirect_notice(location: &str) -> String {
    format!("Redirected to {location}").yellow().to_string()
}

/// Format a page of items, with footer or empty-state message
#[must_use]
pub fn render_page(
    kind: ListingKind,
    items: &[Item],
    current_page: u64,
    total_pages: u64,
    quiet: bool,
) -> Vec<String> {
    let mut lines: Vec<String> = items.iter().map(|item| item_line(item, quiet)).collect();
    if quiet {
        return lines;
    }

    if items.is_empty() {
        lines.push(empty_message(kind));
    } else {
        lines.push(page_footer(current_page, total_pages));
    }
    lines
}

/// Format a tag with usage count
#[must_use]
pub fn tag_with_count(tag: &str, count: usize, quiet: bool) -> String {
    if quiet {
        tag.to_string()
    } else {
        format!("  {tag} (used by {count} item(s))")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Comment;
    use crate::testing::{paper, post};

    #[test]
    fn test_item_line_quiet_is_id() {
        let item = paper("p1", 0, "Data Structures", &["CAT 1"]);
        assert_eq!(item_line(&item, true), "p1");
    }

    #[test]
    fn test_paper_line_shows_title_date_and_tags() {
        let item = paper("p1", 86_400, "Data Structures", &["CAT 1", "2023"]);
        let line = item_line(&item, false);
        assert!(line.contains("Data Structures"));
        assert!(line.contains("1970-01-02"));
        assert!(line.contains("CAT 1, 2023"));
    }

    #[test]
    fn test_post_line_shows_author_and_comments() {
        let item = post("s1", 0, "Exam tips", "alice")
            .with_comment(Comment::new("bob", "thanks"))
            .with_comment(Comment::new("carol", "same"));
        let line = item_line(&item, false);
        assert!(line.contains("Exam tips"));
        assert!(line.contains("alice"));
        assert!(line.contains("2 comment(s)"));
    }

    #[test]
    fn test_render_page_with_footer() {
        let items = vec![paper("p1", 2, "One", &[]), paper("p2", 1, "Two", &[])];
        let lines = render_page(ListingKind::Papers, &items, 2, 3, false);
        assert_eq!(lines.len(), 3);
        assert!(lines[2].contains("Page 2 of 3"));
    }

    #[test]
    fn test_render_empty_page() {
        let lines = render_page(ListingKind::Posts, &[], 1, 0, false);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("No posts match"));

        assert!(render_page(ListingKind::Posts, &[], 1, 0, true).is_empty());
    }

    #[test]
    fn test_render_page_quiet_has_no_footer() {
        let items = vec![paper("p1", 0, "One", &[])];
        assert_eq!(render_page(ListingKind::Papers, &items, 1, 1, true), vec!["p1".to_string()]);
    }

    #[test]
    fn test_tag_with_count() {
        assert_eq!(tag_with_count("CAT 1", 3, true), "CAT 1");
        assert_eq!(tag_with_count("CAT 1", 3, false), "  CAT 1 (used by 3 item(s))");
    }

    #[test]
    fn test_redirect_notice_mentions_location() {
        assert!(redirect_notice("/papers?page=2").contains("/papers?page=2"));
    }
}
