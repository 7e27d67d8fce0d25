use super::DrawableElement;

/// Elements repeated at the top of the body region of every page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageHeader {
    elements: Vec<DrawableElement>,
}

impl PageHeader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_element(&mut self, element: impl Into<DrawableElement>) {
        self.elements.push(element.into());
    }

    pub fn with_element(mut self, element: impl Into<DrawableElement>) -> Self {
        self.add_element(element);
        self
    }

    pub fn elements(&self) -> &[DrawableElement] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
