use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

/// The handful of tree queries the extractor needs. Anything that can hand
/// out tables, rows, cells and links in document order can be scraped.
pub trait ParsedDocument {
    type Node<'a>: Copy
    where
        Self: 'a;

    /// First heading of the page.
    fn heading(&self) -> Option<Self::Node<'_>>;
    fn find_tables(&self) -> Vec<Self::Node<'_>>;
    fn rows_of<'a>(&'a self, table: Self::Node<'a>) -> Vec<Self::Node<'a>>;
    fn cells_of<'a>(&'a self, row: Self::Node<'a>) -> Vec<Self::Node<'a>>;
    fn links_of<'a>(&'a self, cell: Self::Node<'a>) -> Vec<Self::Node<'a>>;
    fn text_of(&self, node: Self::Node<'_>) -> String;
    /// All text that comes before `node` in document order.
    fn text_before(&self, node: Self::Node<'_>) -> String;
}

const E: &str = "Invalid selector";
lazy_static! {
    static ref HEADING: Selector = Selector::parse("h1").expect(E);
    static ref TABLE: Selector = Selector::parse("table").expect(E);
    static ref ROW: Selector = Selector::parse("tr").expect(E);
    static ref CELL: Selector = Selector::parse("td, th").expect(E);
    static ref A: Selector = Selector::parse("a").expect(E);
}

impl ParsedDocument for Html {
    type Node<'a> = ElementRef<'a>;

    fn heading(&self) -> Option<ElementRef<'_>> {
        self.select(&HEADING).next()
    }

    fn find_tables(&self) -> Vec<ElementRef<'_>> {
        self.select(&TABLE).collect()
    }

    fn rows_of<'a>(&'a self, table: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        table.select(&ROW).collect()
    }

    fn cells_of<'a>(&'a self, row: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        row.select(&CELL).collect()
    }

    fn links_of<'a>(&'a self, cell: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        cell.select(&A).collect()
    }

    fn text_of(&self, node: ElementRef<'_>) -> String {
        node.text().collect()
    }

    fn text_before(&self, node: ElementRef<'_>) -> String {
        let target = node.id();
        let mut text = String::new();
        for n in self.tree.root().descendants() {
            if n.id() == target {
                break;
            }
            if let Some(t) = n.value().as_text() {
                text.push_str(t);
            }
        }
        text
    }
}
