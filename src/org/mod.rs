pub mod renderer;
pub mod rules;
pub mod tables;

pub use renderer::{render_org_name, OrgNameRenderer, RenderedName};
pub use tables::{BusinessEntry, OrgType, Role, RuleTables, TableError};
