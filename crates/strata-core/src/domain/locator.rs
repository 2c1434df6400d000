//! Structural locator: anchors resolved against host lines.
//!
//! Every anchor is a pure function from a line slice to an optional insertion
//! index. The index is where the first line of a fragment should land, so the
//! caller always splices *before* it. `None` is an ordinary outcome; the
//! augmentation engine decides what to do with it.
//!
//! Matching is line-oriented and heuristic. [`locate`] is the strict pass.
//! [`locate_relaxed`] loosens each anchor (case-insensitive matching, a bare
//! method name instead of the full signature, brace depth instead of
//! indentation) and is only consulted when configured.

use std::fmt;

/// A named structural location request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// Before the lone `}` closing the method whose signature line contains
    /// `signature` (e.g. `function boot(`).
    MethodBodyEnd { signature: String },
    /// Right after the `{` opening `class <class_name>`.
    ClassBodyStart { class_name: String },
    /// Before the brace closing `class <class_name>`.
    ClassBodyEnd { class_name: String },
    /// Right after the first line containing `marker`.
    MarkerLine { marker: String },
    /// Before the first `closing` line following a line starting with `opening`.
    SectionEnd { opening: String, closing: String },
    /// Before the first line containing `needle`.
    BeforeFirst { needle: String },
    /// After the first line starting with `prefix`, optionally past one blank line.
    AfterLine { prefix: String, skip_blank: bool },
    /// End of the document.
    EndOfFile,
}

impl Anchor {
    pub fn method_body_end(signature: impl Into<String>) -> Self {
        Self::MethodBodyEnd {
            signature: signature.into(),
        }
    }

    pub fn class_body_start(class_name: impl Into<String>) -> Self {
        Self::ClassBodyStart {
            class_name: class_name.into(),
        }
    }

    pub fn class_body_end(class_name: impl Into<String>) -> Self {
        Self::ClassBodyEnd {
            class_name: class_name.into(),
        }
    }

    pub fn marker_line(marker: impl Into<String>) -> Self {
        Self::MarkerLine {
            marker: marker.into(),
        }
    }

    pub fn section_end(opening: impl Into<String>, closing: impl Into<String>) -> Self {
        Self::SectionEnd {
            opening: opening.into(),
            closing: closing.into(),
        }
    }

    pub fn before_first(needle: impl Into<String>) -> Self {
        Self::BeforeFirst {
            needle: needle.into(),
        }
    }

    pub fn after_line(prefix: impl Into<String>, skip_blank: bool) -> Self {
        Self::AfterLine {
            prefix: prefix.into(),
            skip_blank,
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MethodBodyEnd { signature } => write!(f, "end of method `{signature}`"),
            Self::ClassBodyStart { class_name } => write!(f, "start of class {class_name}"),
            Self::ClassBodyEnd { class_name } => write!(f, "end of class {class_name}"),
            Self::MarkerLine { marker } => write!(f, "after marker `{marker}`"),
            Self::SectionEnd { opening, closing } => {
                write!(f, "before `{closing}` of `{opening}`")
            }
            Self::BeforeFirst { needle } => write!(f, "before `{needle}`"),
            Self::AfterLine { prefix, .. } => write!(f, "after line `{prefix}`"),
            Self::EndOfFile => f.write_str("end of file"),
        }
    }
}

/// Strict resolution.
pub fn locate<S: AsRef<str>>(lines: &[S], anchor: &Anchor) -> Option<usize> {
    match anchor {
        Anchor::MethodBodyEnd { signature } => {
            let start = position(lines, |l| l.contains(signature.as_str()))?;
            method_end_by_indent(lines, start)
        }
        Anchor::ClassBodyStart { class_name } => {
            let start = position(lines, |l| declares_class(l, class_name, false))?;
            after_opening_brace(lines, start)
        }
        Anchor::ClassBodyEnd { class_name } => {
            let start = position(lines, |l| declares_class(l, class_name, false))?;
            matching_close(lines, start)
        }
        Anchor::MarkerLine { marker } => {
            position(lines, |l| l.contains(marker.as_str())).map(|i| i + 1)
        }
        Anchor::SectionEnd { opening, closing } => {
            let start = position(lines, |l| l.trim().starts_with(opening.as_str()))?;
            position_from(lines, start + 1, |l| l.trim() == closing.as_str())
        }
        Anchor::BeforeFirst { needle } => position(lines, |l| l.contains(needle.as_str())),
        Anchor::AfterLine { prefix, skip_blank } => {
            let found = position(lines, |l| l.trim_start().starts_with(prefix.as_str()))?;
            Some(skip_one_blank(lines, found + 1, *skip_blank))
        }
        Anchor::EndOfFile => Some(lines.len()),
    }
}

/// Relaxed resolution, tried after a strict miss when enabled.
pub fn locate_relaxed<S: AsRef<str>>(lines: &[S], anchor: &Anchor) -> Option<usize> {
    match anchor {
        Anchor::MethodBodyEnd { signature } => {
            let name = method_name(signature).to_lowercase();
            let start = position(lines, |l| {
                let lower = l.to_lowercase();
                lower.contains("function") && calls_name(&lower, &name)
            })?;
            let close = matching_close(lines, start)?;
            // A collapsed `{}` body has nowhere to splice into.
            (close > start).then_some(close)
        }
        Anchor::ClassBodyStart { class_name } => {
            let start = position(lines, |l| declares_class(l, class_name, true))?;
            after_opening_brace(lines, start)
        }
        Anchor::ClassBodyEnd { class_name } => {
            let start = position(lines, |l| declares_class(l, class_name, true))?;
            matching_close(lines, start)
        }
        Anchor::MarkerLine { marker } => {
            let marker = marker.trim().to_lowercase();
            position(lines, |l| l.to_lowercase().contains(&marker)).map(|i| i + 1)
        }
        Anchor::SectionEnd { opening, closing } => {
            let opening = squash(opening);
            let closing = squash(closing);
            let start = position(lines, |l| squash(l).contains(&opening))?;
            position_from(lines, start + 1, |l| squash(l) == closing)
        }
        Anchor::BeforeFirst { needle } => {
            let needle = squash(needle);
            position(lines, |l| squash(l).contains(&needle))
        }
        Anchor::AfterLine { prefix, skip_blank } => {
            let prefix = prefix.trim().to_lowercase();
            let found = position(lines, |l| l.trim().to_lowercase().starts_with(&prefix))?;
            Some(skip_one_blank(lines, found + 1, *skip_blank))
        }
        Anchor::EndOfFile => Some(lines.len()),
    }
}

// ── Scanning helpers ─────────────────────────────────────────────────────────

fn position<S, F>(lines: &[S], pred: F) -> Option<usize>
where
    S: AsRef<str>,
    F: Fn(&str) -> bool,
{
    position_from(lines, 0, pred)
}

fn position_from<S, F>(lines: &[S], from: usize, pred: F) -> Option<usize>
where
    S: AsRef<str>,
    F: Fn(&str) -> bool,
{
    lines
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, l)| pred(l.as_ref()))
        .map(|(i, _)| i)
}

fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

fn method_end_by_indent<S: AsRef<str>>(lines: &[S], start: usize) -> Option<usize> {
    let signature_line = lines[start].as_ref();
    if signature_line.trim_end().ends_with("{}") {
        return None;
    }
    let indent = indent_width(signature_line);
    position_from(lines, start + 1, |l| {
        l.trim() == "}" && indent_width(l) <= indent
    })
}

fn after_opening_brace<S: AsRef<str>>(lines: &[S], start: usize) -> Option<usize> {
    position_from(lines, start, |l| l.contains('{')).map(|i| i + 1)
}

fn skip_one_blank<S: AsRef<str>>(lines: &[S], index: usize, skip_blank: bool) -> usize {
    match lines.get(index) {
        Some(l) if skip_blank && l.as_ref().trim().is_empty() => index + 1,
        _ => index,
    }
}

/// Does `line` declare `class <name>` (after optional modifiers)?
fn declares_class(line: &str, name: &str, ignore_case: bool) -> bool {
    const MODIFIERS: [&str; 3] = ["final", "abstract", "readonly"];

    let mut words = line.split_whitespace().skip_while(|w| MODIFIERS.contains(w));
    if words.next() != Some("class") {
        return false;
    }
    let Some(candidate) = words.next() else {
        return false;
    };
    let candidate = candidate.trim_end_matches('{');
    if ignore_case {
        candidate.eq_ignore_ascii_case(name)
    } else {
        candidate == name
    }
}

/// `function boot(` -> `boot`
fn method_name(signature: &str) -> &str {
    let s = signature.trim();
    let s = s.rsplit("function").next().unwrap_or(s);
    s.split('(').next().unwrap_or(s).trim()
}

fn calls_name(lower_line: &str, name: &str) -> bool {
    lower_line.match_indices(name).any(|(i, _)| {
        let before_ok = lower_line[..i]
            .chars()
            .next_back()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '_'));
        let after = lower_line[i + name.len()..].trim_start();
        before_ok && after.starts_with('(')
    })
}

/// Lowercase with all whitespace removed.
fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Index of the line holding the brace that closes the first `{` found at or
/// after `start`. Quoted strings and comments are ignored.
fn matching_close<S: AsRef<str>>(lines: &[S], start: usize) -> Option<usize> {
    let mut scanner = BraceScanner::default();
    let mut depth: usize = 0;
    let mut opened = false;

    for (i, line) in lines.iter().enumerate().skip(start) {
        for delta in scanner.braces(line.as_ref()) {
            match delta {
                Brace::Open => {
                    depth += 1;
                    opened = true;
                }
                Brace::Close if opened => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(i);
                    }
                }
                Brace::Close => {}
            }
        }
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Brace {
    Open,
    Close,
}

/// Carries block-comment state across lines.
#[derive(Debug, Default)]
struct BraceScanner {
    in_block_comment: bool,
}

impl BraceScanner {
    fn braces(&mut self, line: &str) -> Vec<Brace> {
        let mut out = Vec::new();
        let mut quote: Option<char> = None;
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            if self.in_block_comment {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    self.in_block_comment = false;
                }
                continue;
            }
            if let Some(q) = quote {
                if c == '\\' {
                    chars.next();
                } else if c == q {
                    quote = None;
                }
                continue;
            }
            match c {
                '\'' | '"' => quote = Some(c),
                '#' => break,
                '/' if chars.peek() == Some(&'/') => break,
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    self.in_block_comment = true;
                }
                '{' => out.push(Brace::Open),
                '}' => out.push(Brace::Close),
                _ => {}
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    const SEEDER: &str = "<?php

namespace Database\\Seeders;

use Illuminate\\Database\\Seeder;

class DatabaseSeeder extends Seeder
{
    public function run(): void
    {
    }
}
";

    #[test]
    fn method_body_end_on_empty_method() {
        let l = lines(SEEDER);
        let idx = locate(&l, &Anchor::method_body_end("function run(")).unwrap();
        assert_eq!(l[idx], "    }");
        assert_eq!(idx, 10);
    }

    #[test]
    fn method_body_end_skips_nested_blocks() {
        let l = lines(
            "class A
{
    public function boot(): void
    {
        if ($x) {
            foo();
        }
        $items = [
        ];
    }
}",
        );
        assert_eq!(locate(&l, &Anchor::method_body_end("function boot(")), Some(9));
    }

    #[test]
    fn inserting_at_method_end_keeps_braces_balanced() {
        let l = lines(SEEDER);
        let idx = locate(&l, &Anchor::method_body_end("function run(")).unwrap();
        let mut owned: Vec<String> = l.iter().map(|s| s.to_string()).collect();
        owned.insert(idx, "        $this->call(X::class);".into());
        assert_eq!(matching_close(&owned, 6), Some(owned.len() - 1));
        assert_eq!(owned[idx + 1], "    }");
    }

    #[test]
    fn method_body_end_not_found() {
        let l = lines(SEEDER);
        assert_eq!(locate(&l, &Anchor::method_body_end("function boot(")), None);
    }

    #[test]
    fn collapsed_method_body_is_not_found() {
        let l = lines("class A\n{\n    public function boot(): void {}\n}\n");
        assert_eq!(locate(&l, &Anchor::method_body_end("function boot(")), None);
        assert_eq!(
            locate_relaxed(&l, &Anchor::method_body_end("function boot(")),
            None
        );
    }

    #[test]
    fn class_body_start_with_modifiers() {
        let l = lines("<?php\n\nfinal class Invoice extends Model\n{\n    use HasFactory;\n}");
        assert_eq!(locate(&l, &Anchor::class_body_start("Invoice")), Some(4));

        let l = lines("readonly class Invoice {\n}");
        assert_eq!(locate(&l, &Anchor::class_body_start("Invoice")), Some(1));
    }

    #[test]
    fn class_name_must_match_exactly() {
        let l = lines("class InvoiceLine\n{\n}");
        assert_eq!(locate(&l, &Anchor::class_body_start("Invoice")), None);
    }

    #[test]
    fn class_body_end_uses_brace_depth() {
        let l = lines(
            "class Invoice extends Model
{
    public function casts(): array
    {
        return ['meta' => 'array']; // }
    }
}
",
        );
        assert_eq!(locate(&l, &Anchor::class_body_end("Invoice")), Some(6));
    }

    #[test]
    fn brace_scanner_ignores_strings_and_comments() {
        let mut s = BraceScanner::default();
        assert_eq!(s.braces("echo '{'; // }"), vec![]);
        assert_eq!(s.braces("/* { "), vec![]);
        assert_eq!(s.braces(" } */ {"), vec![Brace::Open]);
        assert_eq!(s.braces(r#""\"{" }"#), vec![Brace::Close]);
    }

    #[test]
    fn marker_line_returns_index_after_marker() {
        let l = lines("a\n// AUTO-GEN-BINDINGS\nb");
        assert_eq!(locate(&l, &Anchor::marker_line("// AUTO-GEN-BINDINGS")), Some(2));
        assert_eq!(locate(&l, &Anchor::marker_line("// NOPE")), None);
    }

    #[test]
    fn section_end_finds_closing_tag_of_named_section() {
        let l = lines(
            r#"<phpunit>
    <testsuites>
        <testsuite name="Unit">
            <directory>tests/Unit</directory>
        </testsuite>
        <testsuite name="Feature">
            <directory>tests/Feature</directory>
        </testsuite>
    </testsuites>
</phpunit>"#,
        );
        let unit = Anchor::section_end(r#"<testsuite name="Unit">"#, "</testsuite>");
        let feature = Anchor::section_end(r#"<testsuite name="Feature">"#, "</testsuite>");
        assert_eq!(locate(&l, &unit), Some(4));
        assert_eq!(locate(&l, &feature), Some(7));
    }

    #[test]
    fn before_first_and_after_line() {
        let l = lines("<?php\n\nreturn [\n    App\\Providers\\AppServiceProvider::class,\n];\n");
        assert_eq!(locate(&l, &Anchor::before_first("];")), Some(4));

        let l = lines("<?php\n\nnamespace App\\Providers;\n\nuse X;\n");
        assert_eq!(locate(&l, &Anchor::after_line("namespace ", true)), Some(4));
        assert_eq!(locate(&l, &Anchor::after_line("namespace ", false)), Some(3));
    }

    #[test]
    fn end_of_file_always_resolves() {
        let empty: Vec<&str> = vec![];
        assert_eq!(locate(&empty, &Anchor::EndOfFile), Some(0));
        assert_eq!(locate(&lines("a\nb"), &Anchor::EndOfFile), Some(2));
    }

    #[test]
    fn relaxed_method_match_ignores_case_and_signature_shape() {
        let l = lines(
            "class S
{
  public function Boot ()
    {
        x();
  }
}",
        );
        let anchor = Anchor::method_body_end("public function boot(): void");
        assert_eq!(locate(&l, &anchor), None);
        assert_eq!(locate_relaxed(&l, &anchor), Some(5));
    }

    #[test]
    fn relaxed_method_match_does_not_confuse_prefixes() {
        let l = lines("function booted()\n{\n}\nfunction boot()\n{\n}\n");
        assert_eq!(
            locate_relaxed(&l, &Anchor::method_body_end("function boot(")),
            Some(5)
        );
    }

    #[test]
    fn relaxed_before_first_ignores_whitespace() {
        let l = lines("return [\n    A::class,\n] ;\n");
        assert_eq!(locate(&l, &Anchor::before_first("];")), None);
        assert_eq!(locate_relaxed(&l, &Anchor::before_first("];")), Some(2));
    }

    #[test]
    fn method_name_extraction() {
        assert_eq!(method_name("function run("), "run");
        assert_eq!(method_name("public function boot(): void"), "boot");
        assert_eq!(method_name("boot"), "boot");
    }
}
