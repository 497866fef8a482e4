use binrw::BinRead;
use modular_bitfield::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const OFFSET_MASK: u32 = 0x1FFF_FFFF;

/// Determines what an [offset](struct.ResourceAddress.html#method.offset) is relative to.
/// Only [ResourceAddressType::Resource] addresses can be resolved against a resource blob.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(BitfieldSpecifier, Debug, Clone, Copy, PartialEq, Eq)]
#[bits = 3]
pub enum ResourceAddressType {
    Memory = 0,
    Definition = 1,
    /// An offset from the start of the resource data.
    Resource = 2,
    Unknown3 = 3,
    Unknown4 = 4,
    Unknown5 = 5,
    Unknown6 = 6,
    Unknown7 = 7,
}

/// A packed 32 bit location with the [address_type](#method.address_type) in the highest 3 bits
/// and the [offset](#method.offset) in the remaining 29 bits.
/**
```rust
use geometry_lib::{ResourceAddress, ResourceAddressType};

let address = ResourceAddress::from_parts(ResourceAddressType::Resource, 0x20);
assert_eq!(0x4000_0020, address.to_packed());
assert_eq!(address, ResourceAddress::from_packed(0x4000_0020));
```
 */
#[bitfield(bits = 32)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Debug, BinRead, Clone, Copy, PartialEq, Eq)]
#[br(map = Self::from_bytes)]
pub struct ResourceAddress {
    pub offset: B29,
    pub address_type: ResourceAddressType,
}

impl ResourceAddress {
    /// Creates an address from its components.
    /// Only the lowest 29 bits of `offset` are stored.
    pub fn from_parts(address_type: ResourceAddressType, offset: u32) -> Self {
        Self::new()
            .with_offset(offset & OFFSET_MASK)
            .with_address_type(address_type)
    }

    /// Creates an address relative to the start of the resource data.
    pub fn resource(offset: u32) -> Self {
        Self::from_parts(ResourceAddressType::Resource, offset)
    }

    /// Unpacks an address with the type in the highest 3 bits and the offset in the lowest 29 bits.
    pub fn from_packed(value: u32) -> Self {
        Self::from_bytes(value.to_le_bytes())
    }

    /// Packs the type into the highest 3 bits and the offset into the lowest 29 bits.
    pub fn to_packed(&self) -> u32 {
        u32::from_le_bytes(self.into_bytes())
    }

    /// The offset from the start of the resource data or `None` if the address uses any other type.
    /**
    ```rust
    use geometry_lib::{ResourceAddress, ResourceAddressType};

    assert_eq!(Some(8), ResourceAddress::resource(8).resource_offset());

    let address = ResourceAddress::from_parts(ResourceAddressType::Definition, 8);
    assert_eq!(None, address.resource_offset());
    ```
     */
    pub fn resource_offset(&self) -> Option<u32> {
        match self.address_type() {
            ResourceAddressType::Resource => Some(self.offset()),
            _ => None,
        }
    }
}

/// A region of data described by its [size](#structfield.size) and [address](#structfield.address).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(BinRead, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDataReference {
    /// The size of the data in bytes.
    pub size: u32,
    pub unused4: u32,
    pub unused8: u32,
    pub address: ResourceAddress,
    pub unused10: u32,
}
