//! Shared helpers.
//!
//! | Module | Purpose                                        |
//! |--------|------------------------------------------------|
//! | `date` | UTC timestamps for versions and HTTP headers   |
//! | `fs`   | Contained path joins, extensions               |
//! | `html` | Escaping for error pages                       |
//! | `mime` | Content types for published files              |

pub mod date;
pub mod fs;
pub mod html;
pub mod mime;
