//! 内存中的假页面，仅用于测试
//!
//! 节点按"它能匹配哪些选择器字符串"来描述，不解析真正的 CSS。

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::SurfaceError;
use crate::infrastructure::surface::{AutomationSurface, Condition};

pub type NodeId = usize;

/// 页面上发生过的操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Click(NodeId),
    Activate(NodeId),
    Type(NodeId, String),
    Clear(NodeId),
    Navigate(String),
}

#[derive(Debug, Default, Clone)]
pub struct FakeNode {
    selectors: Vec<String>,
    text: String,
    attrs: HashMap<String, String>,
    value: String,
    disabled: bool,
    stale: bool,
    attached: bool,
    children: Vec<NodeId>,
}

impl FakeNode {
    pub fn matching(selectors: &[&str]) -> Self {
        Self {
            selectors: selectors.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn stale(mut self) -> Self {
        self.stale = true;
        self
    }
}

type ClickHook = Box<dyn FnMut(&mut FakeDom) + Send>;

#[derive(Default)]
pub struct FakeDom {
    nodes: Vec<FakeNode>,
    roots: Vec<NodeId>,
    actions: Vec<Action>,
    hooks: HashMap<NodeId, ClickHook>,
}

impl FakeDom {
    pub fn add_root(&mut self, mut node: FakeNode) -> NodeId {
        node.attached = true;
        let id = self.nodes.len();
        self.nodes.push(node);
        self.roots.push(id);
        id
    }

    pub fn add_child(&mut self, parent: NodeId, mut node: FakeNode) -> NodeId {
        node.attached = true;
        let id = self.nodes.len();
        self.nodes.push(node);
        self.nodes[parent].children.push(id);
        id
    }

    /// 把节点（及其子树）从文档中移除，旧句柄随之失效
    pub fn detach(&mut self, id: NodeId) {
        self.roots.retain(|r| *r != id);
        for node in &mut self.nodes {
            node.children.retain(|c| *c != id);
        }
        self.mark_detached(id);
    }

    fn mark_detached(&mut self, id: NodeId) {
        self.nodes[id].attached = false;
        let children = self.nodes[id].children.clone();
        for child in children {
            self.mark_detached(child);
        }
    }

    /// 点击节点时执行的页面变化
    pub fn on_click(&mut self, id: NodeId, hook: impl FnMut(&mut FakeDom) + Send + 'static) {
        self.hooks.insert(id, Box::new(hook));
    }

    fn matches(&self, id: NodeId, selector: &str) -> bool {
        self.nodes[id].selectors.iter().any(|s| s == selector)
    }

    fn collect(&self, from: &[NodeId], selector: &str, out: &mut Vec<NodeId>) {
        for &id in from {
            if self.matches(id, selector) {
                out.push(id);
            }
            self.collect(&self.nodes[id].children, selector, out);
        }
    }

    fn live(&self, id: NodeId) -> Result<&FakeNode, SurfaceError> {
        let node = self.nodes.get(id).ok_or(SurfaceError::Stale)?;
        if node.stale || !node.attached {
            return Err(SurfaceError::Stale);
        }
        Ok(node)
    }
}

/// 假页面
pub struct FakeSurface {
    dom: Mutex<FakeDom>,
}

impl FakeSurface {
    pub fn new(dom: FakeDom) -> Self {
        Self {
            dom: Mutex::new(dom),
        }
    }

    pub fn actions(&self) -> Vec<Action> {
        self.dom.lock().unwrap().actions.clone()
    }

    pub fn value_of(&self, id: NodeId) -> String {
        self.dom.lock().unwrap().nodes[id].value.clone()
    }

    pub fn clicked(&self, id: NodeId) -> bool {
        self.actions().contains(&Action::Click(id))
    }

    pub fn activated(&self, id: NodeId) -> bool {
        self.actions().contains(&Action::Activate(id))
    }

    fn record(&self, id: NodeId, action: Action) -> Result<(), SurfaceError> {
        let mut dom = self.dom.lock().unwrap();
        dom.live(id)?;
        dom.actions.push(action);
        Ok(())
    }
}

#[async_trait]
impl AutomationSurface for FakeSurface {
    type Handle = NodeId;

    async fn find(&self, selector: &str) -> Result<Option<NodeId>, SurfaceError> {
        Ok(self.find_all(selector).await?.into_iter().next())
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<NodeId>, SurfaceError> {
        let dom = self.dom.lock().unwrap();
        let mut out = Vec::new();
        dom.collect(&dom.roots, selector, &mut out);
        Ok(out)
    }

    async fn find_in(&self, parent: &NodeId, selector: &str) -> Result<Option<NodeId>, SurfaceError> {
        Ok(self.find_all_in(parent, selector).await?.into_iter().next())
    }

    async fn find_all_in(&self, parent: &NodeId, selector: &str) -> Result<Vec<NodeId>, SurfaceError> {
        let dom = self.dom.lock().unwrap();
        let node = dom.live(*parent)?;
        let mut out = Vec::new();
        dom.collect(&node.children, selector, &mut out);
        Ok(out)
    }

    async fn wait_for(
        &self,
        selector: &str,
        condition: Condition,
        timeout: Duration,
    ) -> Result<NodeId, SurfaceError> {
        let found = self.find_all(selector).await?;
        let dom = self.dom.lock().unwrap();
        found
            .into_iter()
            .find(|id| condition == Condition::Present || !dom.nodes[*id].disabled)
            .ok_or_else(|| SurfaceError::TimedOut {
                selector: selector.to_string(),
                timeout,
            })
    }

    async fn click(&self, handle: &NodeId) -> Result<(), SurfaceError> {
        self.record(*handle, Action::Click(*handle))?;
        let mut dom = self.dom.lock().unwrap();
        if let Some(mut hook) = dom.hooks.remove(handle) {
            hook(&mut *dom);
            dom.hooks.entry(*handle).or_insert(hook);
        }
        Ok(())
    }

    async fn activate(&self, handle: &NodeId) -> Result<(), SurfaceError> {
        self.record(*handle, Action::Activate(*handle))
    }

    async fn type_text(&self, handle: &NodeId, text: &str) -> Result<(), SurfaceError> {
        self.record(*handle, Action::Type(*handle, text.to_string()))?;
        self.dom.lock().unwrap().nodes[*handle].value.push_str(text);
        Ok(())
    }

    async fn clear(&self, handle: &NodeId) -> Result<(), SurfaceError> {
        self.record(*handle, Action::Clear(*handle))?;
        self.dom.lock().unwrap().nodes[*handle].value.clear();
        Ok(())
    }

    async fn read_text(&self, handle: &NodeId) -> Result<String, SurfaceError> {
        let dom = self.dom.lock().unwrap();
        Ok(dom.live(*handle)?.text.clone())
    }

    async fn read_attribute(&self, handle: &NodeId, name: &str) -> Result<Option<String>, SurfaceError> {
        let dom = self.dom.lock().unwrap();
        Ok(dom.live(*handle)?.attrs.get(name).cloned())
    }

    async fn navigate(&self, url: &str) -> Result<(), SurfaceError> {
        self.dom
            .lock()
            .unwrap()
            .actions
            .push(Action::Navigate(url.to_string()));
        Ok(())
    }
}
