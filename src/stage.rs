use kurbo::Size;

/// Opaque handle to one element on the stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct NodeId(pub u32);

/// The document surface the sequencer animates against.
///
/// Selectors are a stable external contract: `#grid` addresses the grid
/// container, `.content` every content block, `.column.<name> .item .content`
/// one column's blocks in document order, and `.content.home img` the image
/// inside the first block.
pub trait Stage {
    fn viewport(&self) -> Size;

    /// All nodes matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<NodeId>;

    fn query(&self, selector: &str) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    /// Natural (unstyled) size of a node.
    fn measure(&self, node: NodeId) -> Size;

    fn set_size_px(&mut self, node: NodeId, size: Size);
    fn set_scale(&mut self, node: NodeId, scale: f64);
    fn set_translate_y_px(&mut self, node: NodeId, y: f64);

    fn scale_of(&self, node: NodeId) -> f64;
    fn translate_y_of(&self, node: NodeId) -> f64;
    fn size_of(&self, node: NodeId) -> Option<Size>;
}

/// Pre-entry pose the stand-in stylesheet gives the grid container.
pub const GRID_INITIAL_SCALE: f64 = 0.5;
/// Pre-entry pose of the image inside the home content block.
pub const IMAGE_INITIAL_SCALE: f64 = 1.5;

#[derive(Clone, Debug)]
struct MemoryNode {
    selectors: Vec<String>,
    natural: Size,
    size_px: Option<Size>,
    scale: f64,
    translate_y: f64,
}

/// In-memory stand-in for the document, used by tests and the simulator.
///
/// Nodes are stored in document order; selector matching is exact-string.
#[derive(Clone, Debug)]
pub struct MemoryStage {
    viewport: Size,
    nodes: Vec<MemoryNode>,
}

impl MemoryStage {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            nodes: Vec::new(),
        }
    }

    /// Build the node tree the sequencer expects: a grid container, five
    /// columns of `items_per_column` content blocks each, and one image in
    /// the first block of column one (the "home" block).
    pub fn grid(viewport: Size, content: Size, items_per_column: usize) -> Self {
        let mut stage = Self::new(viewport);
        let grid = stage.add_node(&["#grid"], viewport);
        stage.set_scale(grid, GRID_INITIAL_SCALE);

        for (ci, name) in ["one", "two", "three", "four", "five"].iter().enumerate() {
            let column_selector = format!(".column.{name} .item .content");
            for i in 0..items_per_column {
                let mut selectors = vec![".content".to_string(), column_selector.clone()];
                if ci == 0 && i == 0 {
                    selectors.push(".content.home".to_string());
                }
                let selectors: Vec<&str> = selectors.iter().map(String::as_str).collect();
                stage.add_node(&selectors, content);
            }
        }

        let image = stage.add_node(&[".content.home img"], content);
        stage.set_scale(image, IMAGE_INITIAL_SCALE);
        stage
    }

    pub fn add_node(&mut self, selectors: &[&str], natural: Size) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(MemoryNode {
            selectors: selectors.iter().map(|s| s.to_string()).collect(),
            natural,
            size_px: None,
            scale: 1.0,
            translate_y: 0.0,
        });
        id
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    fn node(&self, node: NodeId) -> &MemoryNode {
        &self.nodes[node.0 as usize]
    }

    fn node_mut(&mut self, node: NodeId) -> &mut MemoryNode {
        &mut self.nodes[node.0 as usize]
    }
}

impl Stage for MemoryStage {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.selectors.iter().any(|s| s == selector))
            .map(|(i, _)| NodeId(i as u32))
            .collect()
    }

    fn measure(&self, node: NodeId) -> Size {
        self.node(node).natural
    }

    fn set_size_px(&mut self, node: NodeId, size: Size) {
        self.node_mut(node).size_px = Some(size);
    }

    fn set_scale(&mut self, node: NodeId, scale: f64) {
        self.node_mut(node).scale = scale;
    }

    fn set_translate_y_px(&mut self, node: NodeId, y: f64) {
        self.node_mut(node).translate_y = y;
    }

    fn scale_of(&self, node: NodeId) -> f64 {
        self.node(node).scale
    }

    fn translate_y_of(&self, node: NodeId) -> f64 {
        self.node(node).translate_y
    }

    fn size_of(&self, node: NodeId) -> Option<Size> {
        self.node(node).size_px
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_tree_has_expected_shape() {
        let stage = MemoryStage::grid(Size::new(800.0, 600.0), Size::new(400.0, 300.0), 3);
        assert_eq!(stage.query_all("#grid").len(), 1);
        assert_eq!(stage.query_all(".content").len(), 15);
        for name in ["one", "two", "three", "four", "five"] {
            let sel = format!(".column.{name} .item .content");
            assert_eq!(stage.query_all(&sel).len(), 3);
        }
        assert_eq!(stage.query_all(".content.home img").len(), 1);
    }

    #[test]
    fn query_all_preserves_document_order() {
        let stage = MemoryStage::grid(Size::new(800.0, 600.0), Size::new(400.0, 300.0), 2);
        let nodes = stage.query_all(".column.two .item .content");
        assert!(nodes.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn style_writes_are_recorded() {
        let mut stage = MemoryStage::new(Size::new(100.0, 100.0));
        let n = stage.add_node(&[".content"], Size::new(10.0, 10.0));
        assert_eq!(stage.size_of(n), None);
        stage.set_size_px(n, Size::new(40.0, 15.0));
        stage.set_scale(n, 2.0);
        stage.set_translate_y_px(n, -12.0);
        assert_eq!(stage.size_of(n), Some(Size::new(40.0, 15.0)));
        assert_eq!(stage.scale_of(n), 2.0);
        assert_eq!(stage.translate_y_of(n), -12.0);
    }

    #[test]
    fn initial_poses_come_from_the_stylesheet_stand_in() {
        let stage = MemoryStage::grid(Size::new(800.0, 600.0), Size::new(400.0, 300.0), 1);
        let grid = stage.query("#grid").unwrap();
        let image = stage.query(".content.home img").unwrap();
        assert_eq!(stage.scale_of(grid), GRID_INITIAL_SCALE);
        assert_eq!(stage.scale_of(image), IMAGE_INITIAL_SCALE);
    }
}
