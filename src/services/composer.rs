//! 页面组装
//!
//! 把扫描出的片段和绑定信息组装成 Notion 创建页面的请求体。纯函数，不做任何 I/O。

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::config::NotionConfig;
use crate::models::binding::Binding;
use crate::models::segment::{Segment, unique_tags};

/// 单个 rich text 对象的最大字符数
pub const RICH_TEXT_MAX_CHARS: usize = 2000;

/// multi-select 选项名的最大字符数
pub const SELECT_OPTION_MAX_CHARS: usize = 100;

/// Notion 创建页面请求
///
/// 序列化结果就是 `POST /v1/pages` 的请求体，`secret_key` 只用于鉴权，不进入请求体。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageCreateRequest {
    #[serde(skip)]
    pub secret_key: String,
    pub parent: PageParent,
    pub properties: BTreeMap<String, PropertyValue>,
    pub children: Vec<Block>,
}

impl PageCreateRequest {
    pub fn database_id(&self) -> &str {
        &self.parent.database_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageParent {
    pub database_id: String,
}

/// 页面属性值
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Title { title: Vec<RichText> },
    MultiSelect { multi_select: Vec<SelectOption> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RichText {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: TextContent,
}

impl RichText {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: TextContent {
                content: content.into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextContent {
    pub content: String,
}

/// 段落块
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub object: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub paragraph: Paragraph,
}

impl Block {
    pub fn paragraph(content: &str) -> Self {
        Self {
            object: "block".to_string(),
            kind: "paragraph".to_string(),
            paragraph: Paragraph {
                rich_text: chunk_rich_text(content),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paragraph {
    pub rich_text: Vec<RichText>,
}

/// 页面组装配置
#[derive(Debug, Clone)]
pub struct ComposerConfig {
    /// 数据库的标题属性名
    pub title_property: String,
    /// 数据库的标签属性名
    pub tags_property: String,
    /// 标题最大字符数
    pub title_max_chars: usize,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            title_property: "Name".to_string(),
            tags_property: "Tags".to_string(),
            title_max_chars: 32,
        }
    }
}

impl From<&NotionConfig> for ComposerConfig {
    fn from(config: &NotionConfig) -> Self {
        let defaults = Self::default();
        Self {
            title_property: non_empty_or(&config.title_property, defaults.title_property),
            tags_property: non_empty_or(&config.tags_property, defaults.tags_property),
            title_max_chars: if config.title_max_chars == 0 {
                defaults.title_max_chars
            } else {
                config.title_max_chars
            },
        }
    }
}

fn non_empty_or(value: &str, fallback: String) -> String {
    if value.is_empty() {
        fallback
    } else {
        value.to_string()
    }
}

/// 页面组装器
#[derive(Debug, Clone, Default)]
pub struct PageComposer {
    config: ComposerConfig,
}

impl PageComposer {
    pub fn new(config: ComposerConfig) -> Self {
        Self { config }
    }

    /// 组装创建页面请求
    ///
    /// 每个片段按顺序生成一个段落块；打了标签的片段还会贡献一个 multi-select 选项，
    /// 重复标签只保留第一次出现的位置。
    pub fn compose(&self, binding: &Binding, segments: &[Segment]) -> PageCreateRequest {
        let mut properties = BTreeMap::new();
        properties.insert(
            self.config.title_property.clone(),
            PropertyValue::Title {
                title: self
                    .title_for(segments)
                    .map(|t| vec![RichText::plain(t)])
                    .unwrap_or_default(),
            },
        );

        let tags = unique_tags(segments);
        if !tags.is_empty() {
            properties.insert(
                self.config.tags_property.clone(),
                PropertyValue::MultiSelect {
                    multi_select: tags.into_iter().map(select_option).collect(),
                },
            );
        }

        let mut ordered: Vec<&Segment> = segments.iter().collect();
        ordered.sort_by_key(|s| s.order);

        PageCreateRequest {
            secret_key: binding.secret_key.clone(),
            parent: PageParent {
                database_id: binding.database_id.clone(),
            },
            properties,
            children: ordered
                .into_iter()
                .map(|s| Block::paragraph(&s.content))
                .collect(),
        }
    }

    /// 标题取第一段非空正文的首行，没有正文时用第一个标签
    fn title_for(&self, segments: &[Segment]) -> Option<String> {
        let source = segments
            .iter()
            .filter_map(|s| s.content.lines().map(str::trim).find(|l| !l.is_empty()))
            .next()
            .or_else(|| segments.iter().find(|s| s.is_tagged()).map(|s| s.tag.as_str()))?;

        Some(truncate_chars(source, self.config.title_max_chars))
    }
}

/// Notion 不接受带英文逗号的选项名
fn select_option(tag: &str) -> SelectOption {
    SelectOption {
        name: truncate_chars(&tag.replace(',', "，"), SELECT_OPTION_MAX_CHARS),
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// 按字符数切分正文，空正文得到空数组
fn chunk_rich_text(content: &str) -> Vec<RichText> {
    let chars: Vec<char> = content.chars().collect();
    chars
        .chunks(RICH_TEXT_MAX_CHARS)
        .map(|chunk| RichText::plain(chunk.iter().collect::<String>()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::binding::Platform;
    use crate::services::scanner::scan;
    use serde_json::json;

    fn binding() -> Binding {
        Binding::new(Platform::Lark, "ou_1", "secret_abc", "db_123")
    }

    #[test]
    fn test_compose_tagged_and_untagged() {
        let composer = PageComposer::default();
        let segments = scan("有些人喜欢在中间加#标签 然后");

        let request = composer.compose(&binding(), &segments);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(
            body,
            json!({
                "parent": { "database_id": "db_123" },
                "properties": {
                    "Name": { "title": [{ "type": "text", "text": { "content": "有些人喜欢在中间加" } }] },
                    "Tags": { "multi_select": [{ "name": "标签" }] }
                },
                "children": [
                    {
                        "object": "block",
                        "type": "paragraph",
                        "paragraph": { "rich_text": [{ "type": "text", "text": { "content": "有些人喜欢在中间加" } }] }
                    },
                    {
                        "object": "block",
                        "type": "paragraph",
                        "paragraph": { "rich_text": [{ "type": "text", "text": { "content": "然后" } }] }
                    }
                ]
            })
        );
    }

    #[test]
    fn test_secret_key_is_not_serialized() {
        let request = PageComposer::default().compose(&binding(), &scan("hello"));
        assert_eq!(request.secret_key, "secret_abc");
        assert_eq!(request.database_id(), "db_123");

        let body = serde_json::to_string(&request).unwrap();
        assert!(!body.contains("secret_abc"));
    }

    #[test]
    fn test_untagged_memo_has_no_tags_property() {
        let request = PageComposer::default().compose(&binding(), &scan("这是一条没有标签的memo"));
        assert!(!request.properties.contains_key("Tags"));
        assert_eq!(request.children.len(), 1);
    }

    #[test]
    fn test_duplicate_tags_collapse_in_first_seen_order() {
        let request =
            PageComposer::default().compose(&binding(), &scan("#美食 a #科技 b #美食 c"));

        assert_eq!(
            request.properties["Tags"],
            PropertyValue::MultiSelect {
                multi_select: vec![
                    SelectOption { name: "美食".into() },
                    SelectOption { name: "科技".into() },
                ]
            }
        );
        assert_eq!(request.children.len(), 3);
    }

    #[test]
    fn test_empty_tag_content_gives_empty_paragraph_and_tag_title() {
        let request = PageComposer::default().compose(&binding(), &scan("#待办"));

        assert!(request.children[0].paragraph.rich_text.is_empty());
        assert_eq!(
            request.properties["Name"],
            PropertyValue::Title {
                title: vec![RichText::plain("待办")]
            }
        );
    }

    #[test]
    fn test_long_content_is_chunked_by_chars() {
        let content = "字".repeat(RICH_TEXT_MAX_CHARS * 2 + 5);
        let request = PageComposer::default().compose(&binding(), &[Segment::untagged(content, 0)]);

        let chunks = &request.children[0].paragraph.rich_text;
        let lens: Vec<usize> = chunks.iter().map(|c| c.text.content.chars().count()).collect();
        assert_eq!(lens, vec![RICH_TEXT_MAX_CHARS, RICH_TEXT_MAX_CHARS, 5]);
    }

    #[test]
    fn test_title_is_truncated_by_chars() {
        let composer = PageComposer::new(ComposerConfig {
            title_max_chars: 4,
            ..Default::default()
        });
        let request = composer.compose(&binding(), &scan("#科技 只是一条科技"));

        assert_eq!(
            request.properties["Name"],
            PropertyValue::Title {
                title: vec![RichText::plain("只是一条")]
            }
        );
    }

    #[test]
    fn test_comma_in_tag_is_replaced() {
        let request = PageComposer::default().compose(&binding(), &scan("#a,b text"));
        assert_eq!(
            request.properties["Tags"],
            PropertyValue::MultiSelect {
                multi_select: vec![SelectOption { name: "a，b".into() }]
            }
        );
    }

    #[test]
    fn test_compose_is_deterministic() {
        let composer = PageComposer::default();
        let segments = scan("#科技 只是一条科技#美食 memo");

        let first = serde_json::to_vec(&composer.compose(&binding(), &segments)).unwrap();
        let second = serde_json::to_vec(&composer.compose(&binding(), &segments)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_config_from_notion_config_falls_back_to_defaults() {
        let config = ComposerConfig::from(&NotionConfig {
            tags_property: "标签".into(),
            ..Default::default()
        });

        assert_eq!(config.title_property, "Name");
        assert_eq!(config.tags_property, "标签");
        assert_eq!(config.title_max_chars, 32);
    }
}
