use core::cmp::Ordering;

use super::{DrawCmd, QuadCmd, TextCmd};

/// A recorded command plus its insertion index.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub order: u32,
    pub cmd: DrawCmd,
}

/// Draw stream for one pass of one frame.
///
/// Paint order is ascending depth (farthest first) with insertion order
/// breaking ties, so equal-depth items keep the order they were pushed in.
/// The sorted index buffer is reused across frames.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    next_order: u32,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded items, keeping capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_order = 0;
        self.sorted_indices.clear();
        self.sorted_dirty = true;
    }

    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, cmd: DrawCmd) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);
        self.items.push(DrawItem { order, cmd });
        self.sorted_dirty = true;
    }

    #[inline]
    pub fn push_quad(&mut self, quad: QuadCmd) {
        self.push(DrawCmd::Quad(quad));
    }

    #[inline]
    pub fn push_text(&mut self, text: TextCmd) {
        self.push(DrawCmd::Text(text));
    }

    /// Iterates items back to front without cloning commands.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }
        self.sorted_indices.iter().map(|&i| &self.items[i])
    }

    fn rebuild_sorted_indices(&mut self) {
        self.sorted_indices.clear();
        self.sorted_indices.extend(0..self.items.len());

        let items = &self.items;
        self.sorted_indices.sort_by(|&a, &b| {
            match items[a].cmd.depth().total_cmp(&items[b].cmd.depth()) {
                Ordering::Equal => items[a].order.cmp(&items[b].order),
                o => o,
            }
        });

        self.sorted_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use super::*;
    use crate::paint::Color;

    fn quad(z: f32) -> QuadCmd {
        QuadCmd {
            center: Vec3::new(0.0, 0.0, z),
            size: Vec2::ONE,
            texture: None,
            color: Color::WHITE,
        }
    }

    #[test]
    fn paints_far_to_near() {
        let mut dl = DrawList::new();
        dl.push_quad(quad(9.0));
        dl.push_quad(quad(0.0));
        dl.push_quad(quad(3.0));
        let depths: Vec<f32> = dl.iter_in_paint_order().map(|i| i.cmd.depth()).collect();
        assert_eq!(depths, vec![0.0, 3.0, 9.0]);
    }

    #[test]
    fn equal_depth_keeps_insertion_order() {
        let mut dl = DrawList::new();
        dl.push_quad(quad(1.0));
        dl.push_quad(quad(1.0));
        let orders: Vec<u32> = dl.iter_in_paint_order().map(|i| i.order).collect();
        assert_eq!(orders, vec![0, 1]);
    }

    #[test]
    fn clear_resets_order() {
        let mut dl = DrawList::new();
        dl.push_quad(quad(1.0));
        dl.clear();
        assert!(dl.is_empty());
        dl.push_quad(quad(2.0));
        assert_eq!(dl.items()[0].order, 0);
    }
}
