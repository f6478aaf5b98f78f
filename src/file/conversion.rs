// Author: Dustin Pilgrim
// License: GPL-3.0-or-later

use crate::ast::{Block, Node};
use crate::VdfError;

fn type_error(expected: &str, value: &Node, hint: &str, code: u32) -> VdfError {
    VdfError::TypeError {
        message: format!("Expected {}, got {:?}", expected, value),
        line: 0,
        hint: Some(hint.into()),
        code: Some(code),
    }
}

impl TryFrom<Node> for String {
    type Error = VdfError;

    fn try_from(value: Node) -> Result<Self, Self::Error> {
        match value {
            Node::Scalar(s) => Ok(s),
            _ => Err(type_error("string", &value, "Use a quoted value, not a block", 401)),
        }
    }
}

/// Valve files store flags as `"1"`/`"0"`; `"true"`/`"false"` are accepted too.
impl TryFrom<Node> for bool {
    type Error = VdfError;

    fn try_from(value: Node) -> Result<Self, Self::Error> {
        let parsed = match &value {
            Node::Scalar(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" => Some(true),
                "0" | "false" => Some(false),
                _ => None,
            },
            Node::Block(_) => None,
        };
        parsed.ok_or_else(|| type_error("boolean", &value, "Use \"1\", \"0\", \"true\" or \"false\"", 408))
    }
}

macro_rules! impl_try_from_number {
    ($($ty:ty => $code:expr),* $(,)?) => {
        $(
            impl TryFrom<Node> for $ty {
                type Error = VdfError;

                fn try_from(value: Node) -> Result<Self, Self::Error> {
                    match &value {
                        Node::Scalar(s) => s.trim().parse::<$ty>().map_err(|_| VdfError::TypeError {
                            message: format!("'{}' is not a valid {}", s, stringify!($ty)),
                            line: 0,
                            hint: Some(format!("Use a value in range for {}", stringify!($ty))),
                            code: Some($code),
                        }),
                        Node::Block(_) => Err(type_error("number", &value, "Use a quoted number, not a block", 402)),
                    }
                }
            }
        )*
    };
}

impl_try_from_number! {
    i32 => 403,
    i64 => 403,
    u8 => 404,
    u16 => 404,
    u32 => 404,
    u64 => 404,
    usize => 404,
    f32 => 405,
    f64 => 405,
}

impl TryFrom<Node> for Block {
    type Error = VdfError;

    fn try_from(value: Node) -> Result<Self, Self::Error> {
        match value {
            Node::Block(b) => Ok(b),
            _ => Err(type_error("block", &value, "Use a { ... } block here", 406)),
        }
    }
}

/// The values of a block's entries, in order. Keys are discarded.
impl<T> TryFrom<Node> for Vec<T>
where
    T: TryFrom<Node, Error = VdfError>,
{
    type Error = VdfError;

    fn try_from(value: Node) -> Result<Self, Self::Error> {
        match value {
            Node::Block(b) => b.into_iter().map(|(_, v)| T::try_from(v)).collect(),
            _ => Err(type_error("block", &value, "Lists are written as a block of entries", 406)),
        }
    }
}
