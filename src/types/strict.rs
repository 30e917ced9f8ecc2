//! Homogeneous containers that declare one type code for all elements.
//!
//! Declared codes are only checked when the container is encoded, so
//! elements can be staged freely beforehand.

use super::{Dict, Object};
use crate::codec::CodeByte;
use crate::error::BinonError;

/// A list whose elements all share one declared type code.
#[derive(Debug, Clone, Default)]
pub struct StrictList {
    elem_code: Option<CodeByte>,
    items: Vec<Object>,
}

impl StrictList {
    pub fn new(elem_code: CodeByte) -> Self {
        Self::with_items(elem_code, Vec::new())
    }

    pub fn with_items(elem_code: CodeByte, items: Vec<Object>) -> Self {
        Self {
            elem_code: Some(elem_code.type_code()),
            items,
        }
    }

    /// Declares the first element's type code, or nothing for an empty list.
    pub fn infer(items: Vec<Object>) -> Self {
        Self {
            elem_code: items.first().map(Object::type_code),
            items,
        }
    }

    /// A list with no declared code, as produced by decoding an empty one.
    pub(crate) fn from_parts(elem_code: Option<CodeByte>, items: Vec<Object>) -> Self {
        Self { elem_code, items }
    }

    pub fn elem_code(&self) -> Option<CodeByte> {
        self.elem_code
    }

    pub fn set_elem_code(&mut self, code: CodeByte) {
        self.elem_code = Some(code.type_code());
    }

    pub fn items(&self) -> &[Object] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Vec<Object> {
        &mut self.items
    }

    pub fn into_items(self) -> Vec<Object> {
        self.items
    }

    pub fn push(&mut self, item: impl Into<Object>) {
        self.items.push(item.into());
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// Elements carry their kinds, so the declared code adds nothing to identity
// (and an empty list decodes without one).
impl PartialEq for StrictList {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

/// A dict whose keys share one declared type code; values stay heterogeneous.
#[derive(Debug, Clone, Default)]
pub struct StrictKeyDict {
    key_code: Option<CodeByte>,
    dict: Dict,
}

impl StrictKeyDict {
    pub fn new(key_code: CodeByte) -> Self {
        Self::with_dict(key_code, Dict::new())
    }

    pub fn with_dict(key_code: CodeByte, dict: Dict) -> Self {
        Self {
            key_code: Some(key_code.type_code()),
            dict,
        }
    }

    /// Declares the first key's type code.
    pub fn infer(dict: Dict) -> Self {
        let key_code = dict.keys().next().map(Object::type_code);
        Self { key_code, dict }
    }

    pub(crate) fn from_parts(key_code: Option<CodeByte>, dict: Dict) -> Self {
        Self { key_code, dict }
    }

    pub fn key_code(&self) -> Option<CodeByte> {
        self.key_code
    }

    pub fn set_key_code(&mut self, code: CodeByte) {
        self.key_code = Some(code.type_code());
    }

    pub fn dict(&self) -> &Dict {
        &self.dict
    }

    pub fn dict_mut(&mut self) -> &mut Dict {
        &mut self.dict
    }

    pub fn into_dict(self) -> Dict {
        self.dict
    }

    pub fn insert(
        &mut self,
        key: impl Into<Object>,
        value: impl Into<Object>,
    ) -> Result<Option<Object>, BinonError> {
        self.dict.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.dict.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dict.is_empty()
    }
}

impl PartialEq for StrictKeyDict {
    fn eq(&self, other: &Self) -> bool {
        self.dict == other.dict
    }
}

/// A dict whose keys share one declared code and whose values share another.
#[derive(Debug, Clone, Default)]
pub struct StrictDict {
    key_code: Option<CodeByte>,
    value_code: Option<CodeByte>,
    dict: Dict,
}

impl StrictDict {
    pub fn new(key_code: CodeByte, value_code: CodeByte) -> Self {
        Self::with_dict(key_code, value_code, Dict::new())
    }

    pub fn with_dict(key_code: CodeByte, value_code: CodeByte, dict: Dict) -> Self {
        Self {
            key_code: Some(key_code.type_code()),
            value_code: Some(value_code.type_code()),
            dict,
        }
    }

    /// Declares the first entry's key and value type codes.
    pub fn infer(dict: Dict) -> Self {
        let (key_code, value_code) = match dict.iter().next() {
            Some((k, v)) => (Some(k.type_code()), Some(v.type_code())),
            None => (None, None),
        };
        Self {
            key_code,
            value_code,
            dict,
        }
    }

    pub(crate) fn from_parts(
        key_code: Option<CodeByte>,
        value_code: Option<CodeByte>,
        dict: Dict,
    ) -> Self {
        Self {
            key_code,
            value_code,
            dict,
        }
    }

    pub fn key_code(&self) -> Option<CodeByte> {
        self.key_code
    }

    pub fn value_code(&self) -> Option<CodeByte> {
        self.value_code
    }

    pub fn set_codes(&mut self, key_code: CodeByte, value_code: CodeByte) {
        self.key_code = Some(key_code.type_code());
        self.value_code = Some(value_code.type_code());
    }

    pub fn dict(&self) -> &Dict {
        &self.dict
    }

    pub fn dict_mut(&mut self) -> &mut Dict {
        &mut self.dict
    }

    pub fn into_dict(self) -> Dict {
        self.dict
    }

    pub fn insert(
        &mut self,
        key: impl Into<Object>,
        value: impl Into<Object>,
    ) -> Result<Option<Object>, BinonError> {
        self.dict.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.dict.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dict.is_empty()
    }
}

impl PartialEq for StrictDict {
    fn eq(&self, other: &Self) -> bool {
        self.dict == other.dict
    }
}
