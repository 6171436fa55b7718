//! ドキュメントとノード

use std::collections::VecDeque;
use std::fmt;

use super::{
    DomError,
    MutationFilter,
    MutationRecord,
};

/// ノード ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 要素ノード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// 小文字化したタグ名
    tag: String,
    /// 属性（設定順）
    attributes: Vec<(String, String)>,
}

impl Element {
    /// タグ名
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// 属性値
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    /// 属性を持つか
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// `class` 属性にクラスが含まれるか
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class").is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }

    /// 属性一覧
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

/// ノードの種類
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element(Element),
    Text(String),
    Comment(String),
}

/// アリーナ内のノード
#[derive(Debug, Clone)]
struct Node {
    /// 種類と内容
    kind: NodeKind,
    /// 親ノード
    parent: Option<NodeId>,
    /// 子ノード（文書順）
    children: Vec<NodeId>,
    /// 変更を拒否するか
    read_only: bool,
}

/// 変更監視の状態
#[derive(Debug, Clone)]
struct Observation {
    /// 監視するサブツリーのルート
    root: NodeId,
    /// 記録範囲
    filter: MutationFilter,
    /// 未処理の記録
    records: VecDeque<MutationRecord>,
}

/// ドキュメント
///
/// `html` 要素をルートとし、その下に `body` を持つ。
#[derive(Debug, Clone)]
pub struct Document {
    /// ノードのアリーナ（ID はインデックス）
    nodes: Vec<Node>,
    /// `html` 要素
    document_element: NodeId,
    /// `body` 要素
    body: NodeId,
    /// ドキュメントタイトル
    title: String,
    /// 変更監視
    observation: Option<Observation>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// 空のドキュメントを作成
    #[must_use]
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            document_element: NodeId(0),
            body: NodeId(0),
            title: String::new(),
            observation: None,
        };
        let html = doc.push_node(NodeKind::Element(Element {
            tag: "html".to_string(),
            attributes: Vec::new(),
        }));
        let body = doc.push_node(NodeKind::Element(Element {
            tag: "body".to_string(),
            attributes: Vec::new(),
        }));
        if let Some(node) = doc.nodes.get_mut(body.0) {
            node.parent = Some(html);
        }
        if let Some(node) = doc.nodes.get_mut(html.0) {
            node.children.push(body);
        }
        doc.document_element = html;
        doc.body = body;
        doc
    }

    /// アリーナにノードを追加
    fn push_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { kind, parent: None, children: Vec::new(), read_only: false });
        id
    }

    /// ノードを取得
    fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.nodes.get(id.0).ok_or(DomError::UnknownNode(id))
    }

    /// 変更可能なノードを取得
    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        let node = self.nodes.get_mut(id.0).ok_or(DomError::UnknownNode(id))?;
        if node.read_only {
            return Err(DomError::ReadOnly(id));
        }
        Ok(node)
    }

    /// `html` 要素
    #[must_use]
    pub const fn document_element(&self) -> NodeId {
        self.document_element
    }

    /// `body` 要素
    #[must_use]
    pub const fn body(&self) -> NodeId {
        self.body
    }

    /// ドキュメントタイトル
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// ドキュメントタイトルを設定
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// 要素を作成（未接続）
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(NodeKind::Element(Element {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
        }))
    }

    /// テキストノードを作成（未接続）
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push_node(NodeKind::Text(text.into()))
    }

    /// コメントノードを作成（未接続）
    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.push_node(NodeKind::Comment(text.into()))
    }

    /// ノードへの変更を拒否するようにする
    pub fn set_read_only(&mut self, id: NodeId, read_only: bool) -> Result<(), DomError> {
        let node = self.nodes.get_mut(id.0).ok_or(DomError::UnknownNode(id))?;
        node.read_only = read_only;
        Ok(())
    }

    /// ノードの種類と内容
    pub fn kind(&self, id: NodeId) -> Result<&NodeKind, DomError> {
        Ok(&self.node(id)?.kind)
    }

    /// 要素データ
    pub fn element(&self, id: NodeId) -> Result<&Element, DomError> {
        match self.kind(id)? {
            NodeKind::Element(element) => Ok(element),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    /// タグ名
    pub fn tag_name(&self, id: NodeId) -> Result<&str, DomError> {
        Ok(self.element(id)?.tag())
    }

    /// 親ノード
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok().and_then(|node| node.parent)
    }

    /// 子ノード
    pub fn children(&self, id: NodeId) -> Result<&[NodeId], DomError> {
        Ok(&self.node(id)?.children)
    }

    /// 親をたどる（自身は含まない）
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |current| self.parent(*current))
    }

    /// `ancestor` のサブツリーに含まれるか（自身を含む）
    #[must_use]
    pub fn is_inclusive_descendant(&self, id: NodeId, ancestor: NodeId) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    /// ドキュメントに接続されているか
    #[must_use]
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.is_inclusive_descendant(id, self.document_element)
    }

    /// 子ノードを末尾に追加
    ///
    /// 既に親を持つノードは移動する。
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.element(parent)?;
        self.node_mut(parent)?;
        self.node(child)?;
        if self.is_inclusive_descendant(parent, child) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        if let Some(old_parent) = self.node(child)?.parent {
            self.detach(old_parent, child)?;
        }
        self.node_mut(parent)?.children.push(child);
        if let Some(node) = self.nodes.get_mut(child.0) {
            node.parent = Some(parent);
        }

        self.record(parent, || MutationRecord::ChildList { target: parent, added: vec![child] });
        Ok(())
    }

    /// 子ノードを取り除く
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.node(child)?.parent != Some(parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        self.detach(parent, child)
    }

    /// 親子関係を切る
    fn detach(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.node_mut(parent)?.children.retain(|c| *c != child);
        if let Some(node) = self.nodes.get_mut(child.0) {
            node.parent = None;
        }
        Ok(())
    }

    /// テキストノードの内容
    pub fn text(&self, id: NodeId) -> Result<&str, DomError> {
        match self.kind(id)? {
            NodeKind::Text(text) => Ok(text),
            _ => Err(DomError::NotText(id)),
        }
    }

    /// テキストノードの内容を設定
    pub fn set_text(&mut self, id: NodeId, value: impl Into<String>) -> Result<(), DomError> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Text(text) => *text = value.into(),
            _ => return Err(DomError::NotText(id)),
        }
        self.record(id, || MutationRecord::CharacterData { target: id });
        Ok(())
    }

    /// 属性値
    pub fn attribute(&self, id: NodeId, name: &str) -> Result<Option<&str>, DomError> {
        Ok(self.element(id)?.attribute(name))
    }

    /// 属性を設定
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        let value = value.into();
        let NodeKind::Element(element) = &mut self.node_mut(id)?.kind else {
            return Err(DomError::NotAnElement(id));
        };
        match element.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => element.attributes.push((name.to_string(), value)),
        }

        let watched = self.observation.as_ref().is_some_and(|o| o.filter.watches_attribute(name));
        if watched {
            self.record(id, || MutationRecord::Attributes { target: id, name: name.to_string() });
        }
        Ok(())
    }

    /// 属性を削除
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<(), DomError> {
        let NodeKind::Element(element) = &mut self.node_mut(id)?.kind else {
            return Err(DomError::NotAnElement(id));
        };
        element.attributes.retain(|(n, _)| n != name);
        Ok(())
    }

    /// サブツリーのテキストを文書順に連結
    pub fn text_content(&self, id: NodeId) -> Result<String, DomError> {
        let mut content = String::new();
        for node in self.descendants(id)? {
            if let NodeKind::Text(text) = self.kind(node)? {
                content.push_str(text);
            }
        }
        Ok(content)
    }

    /// 子ノードをすべて置き換えてテキストを設定
    ///
    /// テキストノードに対しては内容を設定する。
    /// 子がテキストノード 1 つだけの場合はそのノードを再利用し、アリーナを増やさない。
    pub fn set_text_content(&mut self, id: NodeId, value: impl Into<String>) -> Result<(), DomError> {
        if matches!(self.kind(id)?, NodeKind::Text(_)) {
            return self.set_text(id, value);
        }
        self.element(id)?;
        self.node_mut(id)?;

        if let [only] = self.children(id)?
            && matches!(self.kind(*only)?, NodeKind::Text(_))
        {
            let only = *only;
            return self.set_text(only, value);
        }

        let old_children = std::mem::take(&mut self.node_mut(id)?.children);
        for child in old_children {
            if let Some(node) = self.nodes.get_mut(child.0) {
                node.parent = None;
            }
        }
        let text = self.create_text(value);
        self.append_child(id, text)
    }

    /// サブツリーのノードを文書順（前順）に列挙する（自身を含む）
    pub fn descendants(&self, root: NodeId) -> Result<Vec<NodeId>, DomError> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id)?.iter().rev());
        }
        Ok(order)
    }

    /// 属性を持つ要素を文書順に列挙する（ルートを含む）
    pub fn elements_with_attribute(&self, root: NodeId, name: &str) -> Result<Vec<NodeId>, DomError> {
        Ok(self
            .descendants(root)?
            .into_iter()
            .filter(|id| self.element(*id).is_ok_and(|el| el.has_attribute(name)))
            .collect())
    }

    /// 変更の記録を開始する
    ///
    /// `root` のサブツリー内の変更のみを記録する。既存の記録は破棄される。
    pub fn observe(&mut self, root: NodeId, filter: MutationFilter) {
        self.observation = Some(Observation { root, filter, records: VecDeque::new() });
    }

    /// 変更の記録を停止する
    pub fn disconnect(&mut self) {
        self.observation = None;
    }

    /// 変更を記録中か
    #[must_use]
    pub const fn is_observed(&self) -> bool {
        self.observation.is_some()
    }

    /// 未処理の記録を取り出す
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        self.observation.as_mut().map(|o| o.records.drain(..).collect()).unwrap_or_default()
    }

    /// 未処理の記録数
    #[must_use]
    pub fn pending_records(&self) -> usize {
        self.observation.as_ref().map_or(0, |o| o.records.len())
    }

    /// 監視範囲内の変更を記録する
    fn record(&mut self, target: NodeId, make: impl FnOnce() -> MutationRecord) {
        let Some(root) = self.observation.as_ref().map(|o| o.root) else {
            return;
        };
        if !self.is_inclusive_descendant(target, root) {
            return;
        }
        if let Some(observation) = self.observation.as_mut() {
            observation.records.push_back(make());
        }
    }
}
