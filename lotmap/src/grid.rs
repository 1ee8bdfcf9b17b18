//! Lotissement en grille: lots numérotés ligne par ligne, routes insérées
//! à intervalle régulier

use serde::Serialize;
use tracing::debug;

use crate::config::GridConfig;
use crate::estate::{Estate, EstateCatalog, EstateStatus};

/// Lot de la grille
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    /// `Block-<n>`
    pub id: String,
    /// `Lot <n>`
    pub name: String,
    pub number: u32,
    pub row: usize,
    pub col: usize,
    pub status: EstateStatus,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoadDirection {
    Horizontal,
    Vertical,
}

/// Cellule de la matrice affichée
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Cell {
    /// Index dans `GridLayout::blocks`
    Block { index: usize },
    Road { direction: RoadDirection },
    Intersection,
}

/// Grille générée: lots et matrice de cellules (routes comprises)
#[derive(Debug, Clone, Serialize)]
pub struct GridLayout {
    pub rows: usize,
    pub cols: usize,
    pub horizontal_roads: Vec<usize>,
    pub vertical_roads: Vec<usize>,
    pub blocks: Vec<Block>,
    pub cells: Vec<Vec<Cell>>,
}

/// Positions des routes: après chaque `interval` unités, strictement avant
/// `count`; liste explicite si aucun intervalle n'est défini (triée,
/// dédoublonnée, hors bornes ignorées)
pub fn road_positions(interval: Option<usize>, explicit: &[usize], count: usize) -> Vec<usize> {
    match interval {
        Some(step) if step > 0 => (step..count).step_by(step).collect(),
        _ => {
            let mut positions: Vec<usize> = explicit
                .iter()
                .copied()
                .filter(|&p| p > 0 && p < count)
                .collect();
            positions.sort_unstable();
            positions.dedup();
            positions
        }
    }
}

/// Prix déterministe: base + pas × rang, modulo l'amplitude
pub fn block_price(config: &GridConfig, number: u32) -> f64 {
    let range = config.max_price - config.min_price;
    if range <= 0.0 || config.price_step <= 0.0 {
        return config.min_price;
    }
    let offset = (f64::from(number.saturating_sub(1)) * config.price_step) % range;
    config.min_price + offset
}

/// Génère la grille
pub fn generate(config: &GridConfig) -> GridLayout {
    let horizontal_roads = road_positions(
        config.horizontal_road_interval,
        &config.horizontal_roads,
        config.rows,
    );
    let vertical_roads = road_positions(
        config.vertical_road_interval,
        &config.vertical_roads,
        config.cols,
    );

    let mut blocks = Vec::with_capacity(config.rows * config.cols);
    for row in 0..config.rows {
        for col in 0..config.cols {
            let number = (row * config.cols + col + 1) as u32;
            let status = if config.sold.contains(&number) {
                EstateStatus::Purchased
            } else {
                EstateStatus::Available
            };
            blocks.push(Block {
                id: format!("Block-{}", number),
                name: format!("Lot {}", number),
                number,
                row,
                col,
                status,
                price: block_price(config, number),
            });
        }
    }

    let mut cells = Vec::new();
    for row in 0..config.rows {
        let mut line = Vec::new();
        for col in 0..config.cols {
            line.push(Cell::Block {
                index: row * config.cols + col,
            });
            if vertical_roads.contains(&(col + 1)) {
                line.push(Cell::Road {
                    direction: RoadDirection::Vertical,
                });
            }
        }
        cells.push(line);

        if horizontal_roads.contains(&(row + 1)) {
            let mut road = Vec::new();
            for col in 0..config.cols {
                road.push(Cell::Road {
                    direction: RoadDirection::Horizontal,
                });
                if vertical_roads.contains(&(col + 1)) {
                    road.push(Cell::Intersection);
                }
            }
            cells.push(road);
        }
    }

    debug!(
        rows = config.rows,
        cols = config.cols,
        horizontal_roads = horizontal_roads.len(),
        vertical_roads = vertical_roads.len(),
        "Generated grid layout"
    );

    GridLayout {
        rows: config.rows,
        cols: config.cols,
        horizontal_roads,
        vertical_roads,
        blocks,
        cells,
    }
}

impl GridLayout {
    /// Catalogue équivalent, pour réutiliser le parcours d'achat
    pub fn catalog(&self) -> EstateCatalog {
        self.blocks
            .iter()
            .map(|b| Estate {
                shape_id: b.id.clone(),
                lot_number: b.number,
                status: b.status,
                price: b.price,
                area: 0.0,
                street_facing: None,
            })
            .collect()
    }

    /// Dimensions de la matrice (routes comprises)
    pub fn matrix_size(&self) -> (usize, usize) {
        (
            self.rows + self.horizontal_roads.len(),
            self.cols + self.vertical_roads.len(),
        )
    }

    /// Rend la grille en SVG: lots en rectangles, routes en bandes grises
    pub fn to_svg(&self, cell_size: f64, road_width: f64) -> String {
        let extent = |n: usize, roads: usize| n as f64 * cell_size + roads as f64 * road_width;
        let width = extent(self.cols, self.vertical_roads.len());
        let height = extent(self.rows, self.horizontal_roads.len());

        let mut out = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = width,
            h = height
        );
        out.push_str(&format!(
            "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"#475569\"/>\n",
            width, height
        ));

        let mut y = 0.0;
        for line in &self.cells {
            let row_height = match line.first() {
                Some(Cell::Block { .. }) => cell_size,
                _ => road_width,
            };
            let mut x = 0.0;
            for cell in line {
                let cell_width = match cell {
                    Cell::Block { .. } | Cell::Road { direction: RoadDirection::Horizontal } => {
                        cell_size
                    }
                    _ => road_width,
                };
                if let Cell::Block { index } = cell {
                    if let Some(block) = self.blocks.get(*index) {
                        let fill = crate::render::estate_fill(block.status, false);
                        out.push_str(&format!(
                            "<rect data-id=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" stroke=\"#1f2937\"/>\n",
                            block.id, x, y, cell_size, cell_size, fill
                        ));
                        out.push_str(&format!(
                            "<text x=\"{}\" y=\"{}\" font-size=\"14\" text-anchor=\"middle\" dominant-baseline=\"middle\">{}</text>\n",
                            x + cell_size / 2.0,
                            y + cell_size / 2.0,
                            block.number
                        ));
                    }
                }
                x += cell_width;
            }
            y += row_height;
        }

        out.push_str("</svg>\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(rows: usize, cols: usize) -> GridConfig {
        GridConfig {
            rows,
            cols,
            horizontal_road_interval: None,
            vertical_road_interval: None,
            horizontal_roads: Vec::new(),
            vertical_roads: Vec::new(),
            min_price: 50000.0,
            max_price: 80000.0,
            price_step: 2500.0,
            sold: Vec::new(),
            cell_size: 60.0,
            road_width: 20.0,
        }
    }

    #[test]
    fn test_road_positions() {
        assert_eq!(road_positions(Some(2), &[], 6), vec![2, 4]);
        assert_eq!(road_positions(Some(3), &[], 6), vec![3]);
        assert_eq!(road_positions(Some(6), &[], 6), Vec::<usize>::new());
        assert_eq!(road_positions(None, &[1, 5], 6), vec![1, 5]);
        assert_eq!(road_positions(Some(0), &[2], 6), vec![2]);
        assert_eq!(road_positions(None, &[5, 0, 3, 3, 6, 9], 6), vec![3, 5]);
    }

    #[test]
    fn test_explicit_roads_out_of_range() {
        let mut cfg = config(2, 2);
        cfg.horizontal_roads = vec![1, 1, 2, 7];
        cfg.vertical_roads = vec![1, 4];

        let layout = generate(&cfg);
        assert_eq!(layout.horizontal_roads, vec![1]);
        assert_eq!(layout.vertical_roads, vec![1]);
        assert_eq!(layout.matrix_size(), (3, 3));
        assert_eq!(layout.cells.len(), 3);
        assert!(layout.cells.iter().all(|line| line.len() == 3));

        let svg = layout.to_svg(60.0, 20.0);
        assert!(svg.contains(r#"width="140" height="140""#));
    }

    #[test]
    fn test_block_numbering() {
        let layout = generate(&config(3, 4));
        assert_eq!(layout.blocks.len(), 12);

        let b = &layout.blocks[5];
        assert_eq!((b.row, b.col), (1, 1));
        assert_eq!(b.id, "Block-6");
        assert_eq!(b.name, "Lot 6");
        assert_eq!(b.number, 6);
    }

    #[test]
    fn test_cells_with_roads() {
        let mut cfg = config(4, 4);
        cfg.horizontal_road_interval = Some(2);
        cfg.vertical_road_interval = Some(2);

        let layout = generate(&cfg);
        assert_eq!(layout.horizontal_roads, vec![2]);
        assert_eq!(layout.vertical_roads, vec![2]);
        assert_eq!(layout.matrix_size(), (5, 5));
        assert_eq!(layout.cells.len(), 5);
        assert!(layout.cells.iter().all(|line| line.len() == 5));

        assert_eq!(
            layout.cells[0][2],
            Cell::Road {
                direction: RoadDirection::Vertical
            }
        );
        assert_eq!(
            layout.cells[2][0],
            Cell::Road {
                direction: RoadDirection::Horizontal
            }
        );
        assert_eq!(layout.cells[2][2], Cell::Intersection);
        assert_eq!(layout.cells[3][0], Cell::Block { index: 8 });
    }

    #[test]
    fn test_prices_deterministic() {
        let cfg = config(2, 10);
        assert_eq!(block_price(&cfg, 1), 50000.0);
        assert_eq!(block_price(&cfg, 2), 52500.0);
        // 12 × 2500 = 30000 ≡ 0 (mod 30000)
        assert_eq!(block_price(&cfg, 13), 50000.0);

        let a = generate(&cfg);
        let b = generate(&cfg);
        assert_eq!(a.blocks, b.blocks);
        assert!(a
            .blocks
            .iter()
            .all(|b| (50000.0..80000.0).contains(&b.price)));
    }

    #[test]
    fn test_sold_lots() {
        let mut cfg = config(2, 2);
        cfg.sold = vec![2, 9];
        let layout = generate(&cfg);
        assert_eq!(layout.blocks[1].status, EstateStatus::Purchased);
        assert_eq!(layout.blocks[0].status, EstateStatus::Available);

        let catalog = layout.catalog();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.get("Block-2").unwrap().status, EstateStatus::Purchased);
    }

    #[test]
    fn test_to_svg() {
        let mut cfg = config(2, 2);
        cfg.vertical_road_interval = Some(1);
        cfg.sold = vec![1];
        let svg = generate(&cfg).to_svg(60.0, 20.0);

        assert!(svg.contains(r#"width="140" height="120""#));
        assert_eq!(svg.matches("data-id=\"Block-").count(), 4);
        assert!(svg.contains(r##"data-id="Block-1" x="0" y="0" width="60" height="60" fill="#3b82f6""##));
        assert!(svg.contains(r#"data-id="Block-2" x="80" y="0""#));
    }
}
