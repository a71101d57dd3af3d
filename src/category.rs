use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Field};

/// Generates a closed categorical enum whose declaration order is its
/// canonical order and whose discriminant is its dense index.
macro_rules! categorical {
    ($(#[$meta:meta])* $name:ident, $field:expr, [$($variant:ident),+ $(,)?]) => {
        paste::paste! {
            pub const [<$name:upper _COUNT>]: usize = [$(stringify!($variant)),+].len();

            $(#[$meta])*
            #[derive(Copy, Clone, Debug, Serialize, Deserialize, Ord, PartialOrd, Eq, PartialEq, Hash)]
            pub enum $name {
                $($variant),+
            }

            impl $name {
                pub const ALL: [$name; [<$name:upper _COUNT>]] = [$($name::$variant),+];

                pub const fn index(self) -> usize {
                    self as usize
                }

                pub fn from_index(index: usize) -> Option<Self> {
                    Self::ALL.get(index).copied()
                }

                pub const fn name(self) -> &'static str {
                    match self {
                        $($name::$variant => stringify!($variant)),+
                    }
                }
            }

            impl FromStr for $name {
                type Err = Error;

                fn from_str(s: &str) -> Result<Self, Error> {
                    match s {
                        $(stringify!($variant) => Ok($name::$variant),)+
                        _ => Err(Error::invalid_category($field, s)),
                    }
                }
            }

            impl Display for $name {
                fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.name())
                }
            }
        }
    };
}

categorical!(
    /// Sales region, ordered North, South, East, West.
    Region,
    Field::Region,
    [North, South, East, West]
);

categorical!(
    /// Product line, ordered Laptop, Phone, Tablet, Monitor, Keyboard.
    Product,
    Field::Product,
    [Laptop, Phone, Tablet, Monitor, Keyboard]
);

pub const GROUP_COUNT: usize = REGION_COUNT * PRODUCT_COUNT;

/// A (region, product) group. The derived ordering is the canonical order:
/// region-major, then product.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct GroupKey {
    pub region: Region,
    pub product: Product,
}

impl GroupKey {
    /// The canonically earliest group, reported as top for empty input.
    pub const FIRST: GroupKey = GroupKey::new(Region::North, Product::Laptop);

    pub const fn new(region: Region, product: Product) -> Self {
        GroupKey { region, product }
    }

    /// Maps raw field values onto a group. The region is checked first, so a
    /// record with both fields invalid reports the region.
    pub fn classify(region: &str, product: &str) -> Result<Self, Error> {
        Ok(GroupKey {
            region: region.parse()?,
            product: product.parse()?,
        })
    }

    pub const fn index(self) -> usize {
        self.region.index() * PRODUCT_COUNT + self.product.index()
    }

    pub fn from_index(index: usize) -> Option<Self> {
        let region = Region::from_index(index / PRODUCT_COUNT)?;
        let product = Product::from_index(index % PRODUCT_COUNT)?;
        Some(GroupKey { region, product })
    }

    /// All groups in canonical order.
    pub fn all() -> impl Iterator<Item = GroupKey> {
        Region::ALL
            .into_iter()
            .flat_map(|region| Product::ALL.into_iter().map(move |product| GroupKey { region, product }))
    }
}

impl Display for GroupKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.region, self.product)
    }
}
