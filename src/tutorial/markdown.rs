//! Fenced code block extraction, used for per-block "copy" actions.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};

/// A fenced code block found in a tutorial step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeBlock {
    /// Info string after the opening fence, if any (`html`, `css`, `js`, ...).
    pub language: Option<String>,

    /// Block body without the fences.
    pub code: String,
}

/// Extracts fenced code blocks in document order.
///
/// Parsing follows CommonMark: fences nested in list items lose the item's
/// indentation, indented code blocks are skipped, and an unterminated fence
/// runs to the end of input. The trailing newline of each body is dropped.
pub fn code_blocks(markdown: &str) -> Vec<CodeBlock> {
    let mut blocks = Vec::new();
    let mut open: Option<CodeBlock> = None;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                let language = info.split_whitespace().next().map(str::to_string);
                open = Some(CodeBlock {
                    language,
                    code: String::new(),
                });
            }
            Event::Text(text) => {
                if let Some(block) = open.as_mut() {
                    block.code.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(mut block) = open.take() {
                    if block.code.ends_with('\n') {
                        block.code.pop();
                    }
                    blocks.push(block);
                }
            }
            _ => {}
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_blocks_in_order() {
        let text = "Step 1\n\n```html\n<div id=\"app\"></div>\n```\n\nThen:\n\n```css\nbody {\n  margin: 0;\n}\n```\n";
        let blocks = code_blocks(text);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].language.as_deref(), Some("html"));
        assert_eq!(blocks[0].code, "<div id=\"app\"></div>");
        assert_eq!(blocks[1].language.as_deref(), Some("css"));
        assert_eq!(blocks[1].code, "body {\n  margin: 0;\n}");
    }

    #[test]
    fn test_block_without_language() {
        let blocks = code_blocks("~~~\nplain\n~~~");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language, None);
        assert_eq!(blocks[0].code, "plain");
    }

    #[test]
    fn test_shorter_fence_does_not_close() {
        let blocks = code_blocks("````md\n```js\nx\n```\n````");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].code, "```js\nx\n```");
    }

    #[test]
    fn test_unterminated_block_runs_to_end() {
        let blocks = code_blocks("```js\nconsole.log(1);\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].code, "console.log(1);");
    }

    #[test]
    fn test_no_blocks() {
        assert!(code_blocks("Just prose, with `inline` code.").is_empty());
    }

    #[test]
    fn test_fence_inside_list_item_drops_item_indent() {
        let blocks = code_blocks("1. Add this:\n   ```html\n   <div></div>\n   ```\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language.as_deref(), Some("html"));
        assert_eq!(blocks[0].code, "<div></div>");
    }

    #[test]
    fn test_indented_code_is_not_a_fence() {
        let blocks = code_blocks("    ```\n    not a fence\n\nreal prose with ```inline``` ticks");
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_inline_triple_backticks_do_not_open_a_block() {
        let blocks = code_blocks("``` `x` ```\n\nSome prose.\n\n```js\nlet y = 1;\n```");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language.as_deref(), Some("js"));
        assert_eq!(blocks[0].code, "let y = 1;");
    }
}
