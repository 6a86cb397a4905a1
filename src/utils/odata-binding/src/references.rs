// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Kind of path segment a name is placed into
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SegmentKind {
    Cube,
    View,
    Dimension,
    Hierarchy,
    Element,
    Subset,
    Group,
    Process,
}

impl SegmentKind {
    fn collection(self) -> &'static str {
        match self {
            SegmentKind::Cube => "Cubes",
            SegmentKind::View => "Views",
            SegmentKind::Dimension => "Dimensions",
            SegmentKind::Hierarchy => "Hierarchies",
            SegmentKind::Element => "Elements",
            SegmentKind::Subset => "Subsets",
            SegmentKind::Group => "Groups",
            SegmentKind::Process => "Processes",
        }
    }

    fn from_collection(collection: &str) -> Option<Self> {
        let kind = match collection {
            "Cubes" => SegmentKind::Cube,
            "Views" => SegmentKind::View,
            "Dimensions" => SegmentKind::Dimension,
            "Hierarchies" => SegmentKind::Hierarchy,
            "Elements" => SegmentKind::Element,
            "Subsets" => SegmentKind::Subset,
            "Groups" => SegmentKind::Group,
            "Processes" => SegmentKind::Process,
            _ => return None,
        };
        Some(kind)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("Cannot build a reference with an empty {segment} name")]
    EmptySegment { segment: SegmentKind },

    #[error("The {segment} name `{value}` contains a single quote which TM1 does not accept")]
    SingleQuote { segment: SegmentKind, value: String },

    #[error("Malformed reference `{reference}`")]
    Malformed { reference: String },
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Formats `<Collection>('<name>')` with the name percent-encoded as a path
/// segment. Everything outside of `ALPHA / DIGIT / - . _ ~` gets encoded.
fn segment(kind: SegmentKind, name: &str) -> Result<String, ReferenceError> {
    if name.is_empty() {
        return Err(ReferenceError::EmptySegment { segment: kind });
    }
    if name.contains('\'') {
        return Err(ReferenceError::SingleQuote {
            segment: kind,
            value: name.to_string(),
        });
    }

    Ok(format!(
        "{}('{}')",
        kind.collection(),
        urlencoding::encode(name)
    ))
}

/// `Dimensions('<dimension>')`
pub fn dimension_ref(dimension_name: &str) -> Result<String, ReferenceError> {
    segment(SegmentKind::Dimension, dimension_name)
}

/// `Dimensions('<dimension>')/Hierarchies('<hierarchy>')`
pub fn hierarchy_ref(dimension_name: &str, hierarchy_name: &str) -> Result<String, ReferenceError> {
    Ok(format!(
        "{}/{}",
        dimension_ref(dimension_name)?,
        segment(SegmentKind::Hierarchy, hierarchy_name)?
    ))
}

/// `Dimensions('<dimension>')/Hierarchies('<hierarchy>')/Elements('<element>')`
pub fn element_ref(
    dimension_name: &str,
    hierarchy_name: &str,
    element_name: &str,
) -> Result<String, ReferenceError> {
    Ok(format!(
        "{}/{}",
        hierarchy_ref(dimension_name, hierarchy_name)?,
        segment(SegmentKind::Element, element_name)?
    ))
}

/// `Dimensions('<dimension>')/Hierarchies('<hierarchy>')/Subsets('<subset>')`
pub fn subset_ref(
    dimension_name: &str,
    hierarchy_name: &str,
    subset_name: &str,
) -> Result<String, ReferenceError> {
    Ok(format!(
        "{}/{}",
        hierarchy_ref(dimension_name, hierarchy_name)?,
        segment(SegmentKind::Subset, subset_name)?
    ))
}

/// `Cubes('<cube>')`
pub fn cube_ref(cube_name: &str) -> Result<String, ReferenceError> {
    segment(SegmentKind::Cube, cube_name)
}

/// `Cubes('<cube>')/Views('<view>')`
pub fn view_ref(cube_name: &str, view_name: &str) -> Result<String, ReferenceError> {
    Ok(format!(
        "{}/{}",
        cube_ref(cube_name)?,
        segment(SegmentKind::View, view_name)?
    ))
}

/// `Groups('<group>')`
pub fn group_ref(group_name: &str) -> Result<String, ReferenceError> {
    segment(SegmentKind::Group, group_name)
}

/// `Processes('<process>')`
pub fn process_ref(process_name: &str) -> Result<String, ReferenceError> {
    segment(SegmentKind::Process, process_name)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Parsing
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// One `<Collection>('<name>')` step of a reference, with the name decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSegment {
    pub kind: SegmentKind,
    pub name: String,
}

/// Splits a reference produced by the builders above back into its segments.
/// Names are percent-decoded, so they may contain `/` only in encoded form.
pub fn parse_reference(reference: &str) -> Result<Vec<ReferenceSegment>, ReferenceError> {
    let malformed = || ReferenceError::Malformed {
        reference: reference.to_string(),
    };

    reference
        .split('/')
        .map(|part| {
            let (collection, rest) = part.split_once("('").ok_or_else(malformed)?;
            let kind = SegmentKind::from_collection(collection).ok_or_else(malformed)?;
            let encoded = rest.strip_suffix("')").ok_or_else(malformed)?;
            if encoded.is_empty() {
                return Err(malformed());
            }
            let Ok(name) = urlencoding::decode(encoded) else {
                return Err(malformed());
            };
            Ok(ReferenceSegment {
                kind,
                name: name.into_owned(),
            })
        })
        .collect()
}

/// Inverse of [`hierarchy_ref`], yields `(dimension, hierarchy)`
pub fn parse_hierarchy_ref(reference: &str) -> Result<(String, String), ReferenceError> {
    match <[ReferenceSegment; 2]>::try_from(parse_reference(reference)?) {
        Ok([d, h]) if d.kind == SegmentKind::Dimension && h.kind == SegmentKind::Hierarchy => {
            Ok((d.name, h.name))
        }
        _ => Err(ReferenceError::Malformed {
            reference: reference.to_string(),
        }),
    }
}

/// Inverse of [`element_ref`], yields `(dimension, hierarchy, element)`
pub fn parse_element_ref(reference: &str) -> Result<(String, String, String), ReferenceError> {
    match <[ReferenceSegment; 3]>::try_from(parse_reference(reference)?) {
        Ok([d, h, e])
            if d.kind == SegmentKind::Dimension
                && h.kind == SegmentKind::Hierarchy
                && e.kind == SegmentKind::Element =>
        {
            Ok((d.name, h.name, e.name))
        }
        _ => Err(ReferenceError::Malformed {
            reference: reference.to_string(),
        }),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
