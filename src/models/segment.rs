use serde::{Deserialize, Serialize};

/// 标签片段
///
/// 一条 memo 文本按 `#标签` 切分后的最小单元。`tag` 为空表示未打标签，
/// `order` 是按出现位置分配的从 0 开始的连续序号。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub tag: String,
    pub content: String,
    pub order: usize,
}

impl Segment {
    pub fn new(tag: impl Into<String>, content: impl Into<String>, order: usize) -> Self {
        Self {
            tag: tag.into(),
            content: content.into(),
            order,
        }
    }

    pub fn untagged(content: impl Into<String>, order: usize) -> Self {
        Self::new(String::new(), content, order)
    }

    pub fn is_tagged(&self) -> bool {
        !self.tag.is_empty()
    }
}

/// 去重后的标签，保持首次出现顺序
pub fn unique_tags(segments: &[Segment]) -> Vec<&str> {
    let mut tags: Vec<&str> = Vec::new();
    for segment in segments.iter().filter(|s| s.is_tagged()) {
        if !tags.contains(&segment.tag.as_str()) {
            tags.push(segment.tag.as_str());
        }
    }
    tags
}
