use ss_core::SourceLocation;

pub const PROPS_KEYWORD: &str = "props";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLabel {
    pub raw: String,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyBlock {
    pub keyword_offset: usize,
    pub label: Option<BlockLabel>,
    pub body_start: usize,
    pub body_end: usize,
    pub closed: bool,
}

/// Finds every `props [label] { ... }` block in keyword position. A `props`
/// token directly followed by `:` is a property declaration, never a block.
pub fn scan_property_blocks(source: &str) -> Vec<PropertyBlock> {
    scan_keyword_blocks(source, PROPS_KEYWORD)
}

/// Brace matching counts nesting, but does not recognize braces inside quoted
/// strings. Known limitation of the scanner, kept shallow on purpose.
pub fn scan_keyword_blocks(source: &str, keyword: &str) -> Vec<PropertyBlock> {
    let bytes = source.as_bytes();
    let mut blocks = Vec::new();
    let mut search_from = 0usize;

    while let Some(found) = source[search_from..].find(keyword) {
        let keyword_offset = search_from + found;
        let keyword_end = keyword_offset + keyword.len();
        search_from = keyword_end;

        if !is_word_boundary(bytes, keyword_offset, keyword_end) {
            continue;
        }

        let mut cursor = skip_whitespace(bytes, keyword_end);
        if cursor < bytes.len() && bytes[cursor] == b':' {
            continue;
        }

        let mut label = None;
        if cursor < bytes.len() && bytes[cursor] != b'{' {
            let token_start = cursor;
            while cursor < bytes.len()
                && !bytes[cursor].is_ascii_whitespace()
                && bytes[cursor] != b'{'
            {
                cursor += 1;
            }
            label = Some(BlockLabel {
                raw: source[token_start..cursor].to_string(),
                offset: token_start,
            });
            cursor = skip_whitespace(bytes, cursor);
        }

        if cursor >= bytes.len() || bytes[cursor] != b'{' {
            continue;
        }

        let body_start = cursor + 1;
        let (body_end, closed) = match_block_body(bytes, body_start);
        blocks.push(PropertyBlock {
            keyword_offset,
            label,
            body_start,
            body_end,
            closed,
        });
        search_from = if closed { body_end + 1 } else { body_end };
    }

    blocks
}

/// Replaces every property-block body with nothing, leaving all other text
/// untouched. Two sources with identical stripped forms differ only inside
/// property declarations.
pub fn strip_property_blocks(source: &str) -> String {
    let blocks = scan_property_blocks(source);
    let mut stripped = String::with_capacity(source.len());
    let mut cursor = 0usize;
    for block in &blocks {
        stripped.push_str(&source[cursor..block.body_start]);
        cursor = block.body_end;
    }
    stripped.push_str(&source[cursor..]);
    stripped
}

/// 1-based line, 0-based column from the last newline.
pub fn location_at(source: &str, offset: usize) -> SourceLocation {
    let offset = offset.min(source.len());
    let before = &source[..offset];
    let line = before.bytes().filter(|byte| *byte == b'\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(newline) => offset - newline - 1,
        None => offset,
    };
    SourceLocation { line, column }
}

fn is_word_boundary(bytes: &[u8], start: usize, end: usize) -> bool {
    let before_ok = start == 0 || !is_word_byte(bytes[start - 1]);
    let after_ok = end >= bytes.len() || !is_word_byte(bytes[end]);
    before_ok && after_ok
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn skip_whitespace(bytes: &[u8], mut cursor: usize) -> usize {
    while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
        cursor += 1;
    }
    cursor
}

/// Returns the offset of the closing brace for a body starting right after an
/// opening brace, and whether that brace was found before end of input.
pub(crate) fn match_block_body(bytes: &[u8], body_start: usize) -> (usize, bool) {
    let mut depth = 1usize;
    let mut cursor = body_start;
    while cursor < bytes.len() {
        match bytes[cursor] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return (cursor, true);
                }
            }
            _ => {}
        }
        cursor += 1;
    }
    (bytes.len(), false)
}
