//! Embedded floor plan and visit log for a small apparel store.
//!
//! The floor is 20 m × 12 m.  Shoppers enter on the west wall and leave
//! through the checkout in the north-east corner.

use std::io::Cursor;

use anyhow::{Context, Result};

use cf_transition::{VisitRecord, load_visits_reader};
use cf_zone::ZoneDefinition;

const ZONES_JSON: &str = r##"[
  { "id": "entrance", "label": "Entrance",
    "bounds": { "rect": { "min": { "x": 0.0, "y": 0.0 }, "max": { "x": 4.0, "y": 12.0 } } },
    "color": "#9e9e9e", "neighbors": ["denim", "tops"] },
  { "id": "denim", "label": "Denim wall",
    "bounds": { "rect": { "min": { "x": 4.0, "y": 0.0 }, "max": { "x": 12.0, "y": 6.0 } } },
    "color": "#3f51b5", "neighbors": ["entrance", "tops", "fitting"] },
  { "id": "tops", "label": "Tops & knitwear",
    "bounds": { "rect": { "min": { "x": 4.0, "y": 6.0 }, "max": { "x": 12.0, "y": 12.0 } } },
    "color": "#e91e63", "neighbors": ["entrance", "denim", "checkout"] },
  { "id": "fitting", "label": "Fitting rooms",
    "bounds": { "polygon": [
      { "x": 12.0, "y": 0.0 }, { "x": 20.0, "y": 0.0 }, { "x": 20.0, "y": 8.0 },
      { "x": 16.0, "y": 8.0 }, { "x": 16.0, "y": 4.0 }, { "x": 12.0, "y": 4.0 }
    ] },
    "color": "#ff9800", "neighbors": ["denim", "checkout"] },
  { "id": "checkout", "label": "Checkout",
    "bounds": { "polygon": [
      { "x": 12.0, "y": 4.0 }, { "x": 16.0, "y": 4.0 }, { "x": 16.0, "y": 8.0 },
      { "x": 20.0, "y": 8.0 }, { "x": 20.0, "y": 12.0 }, { "x": 12.0, "y": 12.0 }
    ] },
    "color": "#4caf50", "neighbors": ["tops", "fitting"] }
]"##;

// Timestamps are seconds since the store opened.
const VISITS_CSV: &str = "\
subject_id,zone_id,timestamp\n\
t01,entrance,0\n\
t01,denim,20\n\
t01,fitting,260\n\
t01,checkout,620\n\
t02,entrance,45\n\
t02,tops,60\n\
t02,checkout,300\n\
t03,entrance,90\n\
t03,denim,110\n\
t03,tops,290\n\
t03,fitting,470\n\
t03,denim,830\n\
t03,checkout,950\n\
t04,entrance,130\n\
t04,tops,150\n\
t04,denim,400\n\
t04,fitting,520\n\
t04,checkout,800\n\
t05,entrance,200\n\
t05,denim,215\n\
t05,entrance,400\n\
t06,entrance,260\n\
t06,tops,280\n\
t06,tops,330\n\
t06,checkout,510\n\
t07,entrance,300\n\
t07,denim,330\n\
t07,fitting,500\n\
t07,checkout,900\n\
t08,entrance,350\n\
t08,tops,365\n\
t08,entrance,480\n\
t09,entrance,410\n\
t09,denim,440\n\
t09,tops,600\n\
t09,checkout,760\n\
t10,entrance,500\n\
t10,tops,520\n\
t10,denim,700\n\
t10,fitting,820\n\
t10,checkout,1200\n\
";

pub fn zone_definitions() -> Result<Vec<ZoneDefinition>> {
    serde_json::from_str(ZONES_JSON).context("parsing embedded floor plan")
}

pub fn visit_records() -> Result<Vec<VisitRecord>> {
    load_visits_reader(Cursor::new(VISITS_CSV)).context("parsing embedded visit log")
}
