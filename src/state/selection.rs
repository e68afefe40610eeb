use std::collections::BTreeSet;

/// Which dataset is current and which of its columns are picked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionController {
    current_dataset: Option<usize>,
    selected: BTreeSet<usize>,
    /// Last column selected without being deselected since; shift-click
    /// extends from here.
    anchor: Option<usize>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_dataset(&self) -> Option<usize> {
        self.current_dataset
    }

    pub fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    pub fn is_selected(&self, column: usize) -> bool {
        self.selected.contains(&column)
    }

    /// Switch datasets; column picks belong to a dataset, so they are dropped.
    pub fn select_dataset(&mut self, index: usize) {
        self.current_dataset = Some(index);
        self.clear();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }

    /// Toggle one column the way a list box click does.
    ///
    /// Without `ctrl` the click replaces the selection. With `shift` and an
    /// anchor, selecting also fills `[min(anchor, column), max(anchor, column))`;
    /// the upper end of that range is exclusive.
    pub fn toggle_column(&mut self, column: usize, ctrl: bool, shift: bool) {
        let now_selected = !self.selected.contains(&column);
        if !ctrl {
            self.selected.clear();
        }

        if now_selected {
            self.selected.insert(column);
            if shift {
                if let Some(anchor) = self.anchor {
                    let lo = anchor.min(column);
                    let hi = anchor.max(column);
                    self.selected.extend(lo..hi);
                }
            }
            self.anchor = Some(column);
        } else {
            self.selected.remove(&column);
            self.anchor = None;
        }
    }
}
