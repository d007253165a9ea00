//! 标签扫描
//!
//! 把一段 memo 文本按 `#标签` 切分成有序片段。按 Unicode 字符而不是字节处理，
//! 中英文混排时不会截断多字节字符。
//!
//! 规则：
//! - `#` 之后直到空白字符、下一个 `#` 或文本结尾的连续字符是标签名；
//! - 标签名与正文之间的空白是分隔符，会被丢弃；
//! - 标签的正文一直延伸到下一个有效 `#` 或文本结尾；
//! - 第一个标签之前的文本作为无标签片段输出；
//! - 标签名为空的 `#`（后面紧跟空白、`#` 或结尾）按普通字符处理。
//!
//! 只有字面空白算分隔符，`#标签，正文` 整体都是标签名。

use std::iter::Peekable;
use std::str::Chars;

use crate::models::segment::Segment;

/// 标签标记
pub const TAG_MARKER: char = '#';

/// 扫描文本，返回按出现顺序排列的片段
pub fn scan(raw_text: &str) -> Vec<Segment> {
    let mut scanner = TagScanner::default();
    let mut chars = raw_text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != TAG_MARKER {
            scanner.buffer.push(c);
            continue;
        }

        let name = read_tag_name(&mut chars);
        if name.is_empty() {
            scanner.buffer.push(c);
            continue;
        }

        scanner.flush();
        scanner.tag = Some(name);
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
    }

    scanner.flush();
    scanner.segments
}

#[derive(Default)]
struct TagScanner {
    segments: Vec<Segment>,
    tag: Option<String>,
    buffer: String,
}

impl TagScanner {
    /// 输出当前片段。打了标签的片段即使正文为空也输出，无标签的空片段跳过。
    fn flush(&mut self) {
        let content = std::mem::take(&mut self.buffer);
        let order = self.segments.len();

        match self.tag.take() {
            Some(tag) => self.segments.push(Segment::new(tag, content, order)),
            None if !content.is_empty() => self.segments.push(Segment::untagged(content, order)),
            None => {}
        }
    }
}

fn read_tag_name(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut name = String::new();
    while let Some(c) = chars.next_if(|c| !c.is_whitespace() && *c != TAG_MARKER) {
        name.push(c);
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn pairs(segments: &[Segment]) -> Vec<(&str, &str)> {
        segments
            .iter()
            .map(|s| (s.tag.as_str(), s.content.as_str()))
            .collect()
    }

    #[rstest]
    #[case("#科技 technology change our life!", vec![("科技", "technology change our life!")])]
    #[case("这是一条没有标签的memo", vec![("", "这是一条没有标签的memo")])]
    #[case("#科技 只是一条科技#美食 memo", vec![("科技", "只是一条科技"), ("美食", "memo")])]
    #[case("有些人喜欢在中间加#标签 然后", vec![("", "有些人喜欢在中间加"), ("标签", "然后")])]
    #[case("#A #B text", vec![("A", ""), ("B", "text")])]
    #[case(
        "使用#欢迎 来给内容添加任意标签, 数量不限(注意标签和正文中间应该有个空格哦)",
        vec![("", "使用"), ("欢迎", "来给内容添加任意标签, 数量不限(注意标签和正文中间应该有个空格哦)")]
    )]
    fn test_scan_cases(#[case] input: &str, #[case] expected: Vec<(&str, &str)>) {
        let segments = scan(input);
        assert_eq!(pairs(&segments), expected);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(scan("").is_empty());
    }

    #[test]
    fn test_tag_at_end_has_empty_content() {
        let segments = scan("记一下#待办");
        assert_eq!(pairs(&segments), vec![("", "记一下"), ("待办", "")]);
    }

    #[test]
    fn test_glued_tag_reads_up_to_whitespace() {
        assert_eq!(pairs(&scan("#AB")), vec![("AB", "")]);
        assert_eq!(pairs(&scan("#标签，内容 正文")), vec![("标签，内容", "正文")]);
    }

    #[test]
    fn test_adjacent_markers_split_tags() {
        assert_eq!(pairs(&scan("#A#B x")), vec![("A", ""), ("B", "x")]);
    }

    #[test]
    fn test_bare_marker_is_literal() {
        assert_eq!(pairs(&scan("# not a tag")), vec![("", "# not a tag")]);
        assert_eq!(pairs(&scan("价格 100#")), vec![("", "价格 100#")]);
        assert_eq!(pairs(&scan("##B x")), vec![("", "#"), ("B", "x")]);
    }

    #[test]
    fn test_delimiting_whitespace_is_discarded() {
        assert_eq!(pairs(&scan("#A   \t text")), vec![("A", "text")]);
        // 全角空格同样是分隔符
        assert_eq!(pairs(&scan("#读书\u{3000}三体")), vec![("读书", "三体")]);
    }

    #[test]
    fn test_content_whitespace_is_kept() {
        assert_eq!(
            pairs(&scan("早上 #跑步 5km #晚饭 面条")),
            vec![("", "早上 "), ("跑步", "5km "), ("晚饭", "面条")]
        );
    }

    #[test]
    fn test_order_is_contiguous() {
        let segments = scan("前言#一 a#二 b#三 c");
        let orders: Vec<usize> = segments.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_untagged_text_is_kept_whole() {
        let inputs = ["plain ascii", "  leading and trailing  ", "多字节 🎉 emoji"];
        for input in inputs {
            assert_eq!(scan(input), vec![Segment::untagged(input, 0)]);
        }
    }

    #[test]
    fn test_no_characters_are_dropped() {
        let input = "开头 #工作 周报 #生活 买菜#学习 rust";
        let rebuilt: String = scan(input)
            .iter()
            .map(|s| {
                if s.is_tagged() {
                    format!("#{} {}", s.tag, s.content)
                } else {
                    s.content.clone()
                }
            })
            .collect();
        assert_eq!(rebuilt, input);
    }
}
