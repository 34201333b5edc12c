pub mod annotations;
pub mod atom;
pub mod bond;
pub mod drawer;
pub mod element;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod layout;
pub mod math;
pub mod options;
pub mod parse_tree;
pub mod rings;
pub mod smiles;
pub mod stereo;

pub use annotations::{AnnotationValue, Annotations};
pub use atom::{Atom, Chirality, Cip};
pub use bond::{BondType, Edge, Wedge};
pub use drawer::{Drawer, Drawing, Molecule};
pub use error::{AnnotationError, DrawError, GraphError, LayoutError, OptionsError, SmilesError};
pub use geometry::{AromaticRing, BondGeometry, LineGeometry, WedgeGeometry};
pub use graph::{Graph, Vertex};
pub use layout::kamada_kawai::{KkOutcome, KkParams};
pub use math::{DVec2, Line, PlaneExt};
pub use options::DrawOptions;
pub use parse_tree::{BracketAtom, ParseAtom, ParseNode, RingBond};
pub use rings::{Ring, RingConnection, RingSet};
pub use smiles::parse as parse_smiles;
