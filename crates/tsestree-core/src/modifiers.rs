//! Modifier enumeration.
//!
//! swc folds modifiers into boolean fields and silently drops the ones it
//! considers meaningless, so the keywords in front of a declaration are
//! recovered from the source text instead. Decorator ranges are jumped over.

use crate::location::Range;
use crate::scanner::{is_identifier_part, scan_word, skip_trivia};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKind {
    Abstract,
    Accessor,
    Async,
    Const,
    Declare,
    Default,
    Export,
    In,
    Out,
    Override,
    Private,
    Protected,
    Public,
    Readonly,
    Static,
}

impl ModifierKind {
    pub fn from_word(word: &str) -> Option<Self> {
        Some(match word {
            "abstract" => ModifierKind::Abstract,
            "accessor" => ModifierKind::Accessor,
            "async" => ModifierKind::Async,
            "const" => ModifierKind::Const,
            "declare" => ModifierKind::Declare,
            "default" => ModifierKind::Default,
            "export" => ModifierKind::Export,
            "in" => ModifierKind::In,
            "out" => ModifierKind::Out,
            "override" => ModifierKind::Override,
            "private" => ModifierKind::Private,
            "protected" => ModifierKind::Protected,
            "public" => ModifierKind::Public,
            "readonly" => ModifierKind::Readonly,
            "static" => ModifierKind::Static,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModifierKind::Abstract => "abstract",
            ModifierKind::Accessor => "accessor",
            ModifierKind::Async => "async",
            ModifierKind::Const => "const",
            ModifierKind::Declare => "declare",
            ModifierKind::Default => "default",
            ModifierKind::Export => "export",
            ModifierKind::In => "in",
            ModifierKind::Out => "out",
            ModifierKind::Override => "override",
            ModifierKind::Private => "private",
            ModifierKind::Protected => "protected",
            ModifierKind::Public => "public",
            ModifierKind::Readonly => "readonly",
            ModifierKind::Static => "static",
        }
    }

    pub fn is_accessibility(self) -> bool {
        matches!(
            self,
            ModifierKind::Public | ModifierKind::Protected | ModifierKind::Private
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modifier {
    pub kind: ModifierKind,
    pub range: Range,
}

impl Modifier {
    pub fn new(kind: ModifierKind, range: Range) -> Self {
        Self { kind, range }
    }
}

/// How `const` is read in front of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstMode {
    /// `const enum`, `<const T>`: `const` is a modifier.
    Modifier,
    /// `const x = 1`: `const` starts the declaration list.
    Keyword,
}

/// Collects the modifier keywords written between `start` and `limit`.
///
/// Scanning stops at the first word that is not a modifier, at any other
/// punctuation, or at `limit`. Ranges in `skip` (decorators) are jumped over.
pub fn scan_modifiers(
    text: &str,
    start: u32,
    limit: u32,
    skip: &[Range],
    const_mode: ConstMode,
) -> Vec<Modifier> {
    let mut modifiers = Vec::new();
    let limit = (limit as usize).min(text.len());
    let mut pos = start as usize;

    loop {
        pos = skip_trivia(text, pos);
        if pos >= limit {
            break;
        }
        if let Some(decorator) = skip.iter().find(|r| r.0 as usize == pos) {
            pos = (decorator.1 as usize).max(pos + 1);
            continue;
        }
        let Some(end) = scan_word(text, pos) else {
            break;
        };
        if end > limit {
            break;
        }
        let Some(kind) = ModifierKind::from_word(&text[pos..end]) else {
            break;
        };
        if kind == ModifierKind::Const && const_mode == ConstMode::Keyword {
            break;
        }
        modifiers.push(Modifier::new(kind, Range(pos as u32, end as u32)));
        pos = end;
    }

    modifiers
}

/// Offset of the first token after the leading `export` / `default`
/// keywords, used to truncate a declaration wrapped by an export node.
pub fn after_export_keywords(text: &str, start: u32, skip: &[Range]) -> u32 {
    let mut pos = start as usize;
    loop {
        pos = skip_trivia(text, pos);
        if let Some(decorator) = skip.iter().find(|r| r.0 as usize == pos) {
            pos = (decorator.1 as usize).max(pos + 1);
            continue;
        }
        match scan_word(text, pos) {
            Some(end) if matches!(&text[pos..end], "export" | "default") => pos = end,
            _ => return pos as u32,
        }
    }
}

/// Decorators written in front of `start` or between `start` and `limit`.
///
/// swc drops decorators on declarations that cannot carry them, so their
/// ranges are recovered from the text for the grammar check.
pub fn scan_stray_decorators(text: &str, start: u32, limit: u32) -> Vec<Range> {
    let mut decorators = decorators_before(text, start as usize);
    let limit = (limit as usize).min(text.len());
    let mut pos = start as usize;
    loop {
        pos = skip_trivia(text, pos);
        if pos >= limit {
            break;
        }
        if let Some(end) = scan_decorator(text, pos) {
            decorators.push(Range(pos as u32, end as u32));
            pos = end;
        } else if let Some(end) = scan_word(text, pos) {
            pos = end;
        } else {
            break;
        }
    }
    decorators
}

/// End of the decorator starting at `pos`: `@name(.name)*` with an optional
/// argument list.
fn scan_decorator(text: &str, pos: usize) -> Option<usize> {
    if text.as_bytes().get(pos) != Some(&b'@') {
        return None;
    }
    let mut end = scan_word(text, pos + 1)?;
    while text.as_bytes().get(end) == Some(&b'.') {
        end = scan_word(text, end + 1)?;
    }
    let after = skip_trivia(text, end);
    if text.as_bytes().get(after) == Some(&b'(') {
        return skip_balanced(text, after);
    }
    Some(end)
}

/// Offset just past the bracket matching the one at `open`.
fn skip_balanced(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut pos = open;
    while pos < bytes.len() {
        match bytes[pos] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(pos + 1);
                }
            }
            quote @ (b'\'' | b'"' | b'`') => {
                pos += 1;
                while pos < bytes.len() && bytes[pos] != quote {
                    if bytes[pos] == b'\\' {
                        pos += 1;
                    }
                    pos += 1;
                }
            }
            _ => {}
        }
        pos += 1;
    }
    None
}

/// Decorators written directly before `start`, in source order.
fn decorators_before(text: &str, start: usize) -> Vec<Range> {
    let mut found = Vec::new();
    let mut end = start.min(text.len());
    while let Some(decorator_start) = decorator_ending_at(text, trim_trivia_back(text, end)) {
        let decorator_end = trim_trivia_back(text, end);
        found.push(Range(decorator_start as u32, decorator_end as u32));
        end = decorator_start;
    }
    found.reverse();
    found
}

fn trim_trivia_back(text: &str, mut pos: usize) -> usize {
    loop {
        let trimmed = text[..pos].trim_end();
        pos = trimmed.len();
        if trimmed.ends_with("*/") {
            match trimmed[..pos - 2].rfind("/*") {
                Some(open) => pos = open,
                None => return pos,
            }
        } else {
            return pos;
        }
    }
}

/// Start of a decorator whose last byte is at `end - 1`.
fn decorator_ending_at(text: &str, end: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut pos = end;
    if pos > 0 && bytes[pos - 1] == b')' {
        let mut depth = 0usize;
        loop {
            pos = pos.checked_sub(1)?;
            match bytes[pos] {
                b')' => depth += 1,
                b'(' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
        pos = trim_trivia_back(text, pos);
    }
    let name_end = pos;
    while pos > 0 {
        let c = text[..pos].chars().next_back()?;
        if is_identifier_part(c) || c == '.' {
            pos -= c.len_utf8();
        } else {
            break;
        }
    }
    if pos == name_end || pos == 0 || bytes[pos - 1] != b'@' {
        return None;
    }
    let at = pos - 1;
    let line_start = text[..at].rfind('\n').map_or(0, |i| i + 1);
    if text[line_start..at].contains("//") {
        return None;
    }
    Some(at)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str, limit: u32, mode: ConstMode) -> Vec<ModifierKind> {
        scan_modifiers(text, 0, limit, &[], mode)
            .into_iter()
            .map(|m| m.kind)
            .collect()
    }

    #[test]
    fn collects_leading_modifiers_up_to_the_name() {
        let text = "public static readonly x = 1;";
        assert_eq!(
            kinds(text, 23, ConstMode::Keyword),
            vec![
                ModifierKind::Public,
                ModifierKind::Static,
                ModifierKind::Readonly
            ]
        );
    }

    #[test]
    fn modifier_ranges_point_at_keywords() {
        let mods = scan_modifiers("  private x", 0, 10, &[], ConstMode::Keyword);
        assert_eq!(mods[0].range, Range(2, 9));
    }

    #[test]
    fn name_that_looks_like_a_modifier_is_not_one() {
        assert!(kinds("static() {}", 0, ConstMode::Keyword).is_empty());
    }

    #[test]
    fn stops_at_declaration_keyword() {
        assert_eq!(
            kinds("export declare const x: number;", 31, ConstMode::Keyword),
            vec![ModifierKind::Export, ModifierKind::Declare]
        );
        assert_eq!(
            kinds("export async function f() {}", 28, ConstMode::Keyword),
            vec![ModifierKind::Export, ModifierKind::Async]
        );
    }

    #[test]
    fn const_enum_keeps_const() {
        assert_eq!(
            kinds("declare const enum E {}", 23, ConstMode::Modifier),
            vec![ModifierKind::Declare, ModifierKind::Const]
        );
    }

    #[test]
    fn decorators_are_skipped() {
        let text = "@dec() @other private x;";
        let skip = [Range(0, 6), Range(7, 13)];
        let mods = scan_modifiers(text, 0, 22, &skip, ConstMode::Keyword);
        assert_eq!(mods.len(), 1);
        assert_eq!(mods[0].kind, ModifierKind::Private);
    }

    #[test]
    fn export_keywords_are_stepped_over() {
        let text = "export default class A {}";
        assert_eq!(after_export_keywords(text, 0, &[]), 15);
        assert_eq!(after_export_keywords("export  function f() {}", 0, &[]), 8);
    }

    #[test]
    fn stray_decorators_in_front_and_inside() {
        let text = "@a @b.c(1, (2)) interface I {}";
        assert_eq!(
            scan_stray_decorators(text, 16, 26),
            vec![Range(0, 2), Range(3, 15)]
        );
        let member = "{ @dec constructor() {} }";
        assert_eq!(scan_stray_decorators(member, 2, 7), vec![Range(2, 6)]);
        let exported = "export @dec enum E {}";
        assert_eq!(scan_stray_decorators(exported, 0, 17), vec![Range(7, 11)]);
    }

    #[test]
    fn commented_and_foreign_text_is_not_a_decorator() {
        assert!(scan_stray_decorators("// @dec\ninterface I {}", 8, 18).is_empty());
        assert!(scan_stray_decorators("/* @dec */ interface I {}", 11, 21).is_empty());
        assert!(scan_stray_decorators("x = a.b\ninterface I {}", 8, 18).is_empty());
    }
}
