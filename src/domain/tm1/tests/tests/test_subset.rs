// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use indoc::indoc;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tm1_domain::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_static_subset_body() {
    let subset = Subset::new_static("Top10", "Region", "Region", ["North", "South West"]);

    assert!(subset.is_static());
    assert_eq!(
        Value::Object(subset.body_as_map().unwrap()),
        json!({
            "Name": "Top10",
            "Hierarchy@odata.bind": "Dimensions('Region')/Hierarchies('Region')",
            "Elements@odata.bind": [
                "Dimensions('Region')/Hierarchies('Region')/Elements('North')",
                "Dimensions('Region')/Hierarchies('Region')/Elements('South%20West')",
            ],
        })
    );
}

#[test]
fn test_dynamic_subset_body() {
    let expression = "{TM1FILTERBYLEVEL({TM1SUBSETALL([Region])},0)}";
    let subset = Subset::new_dynamic("Top10", "Region", "Region", expression);

    assert!(subset.is_dynamic());
    let body = subset.body_as_map().unwrap();
    assert_eq!(body["Expression"], json!(expression));
    assert!(!body.contains_key("Elements@odata.bind"));
    assert_eq!(
        body["Hierarchy@odata.bind"],
        json!("Dimensions('Region')/Hierarchies('Region')")
    );
}

#[test]
fn test_subset_body_keeps_duplicates_and_alias() {
    let subset = Subset::new_static("Pair", "Region", "", ["North", "North"]).with_alias("Code");

    assert_eq!(subset.hierarchy_name, "Region");
    assert_eq!(
        Value::Object(subset.body_as_map().unwrap()),
        json!({
            "Name": "Pair",
            "Alias": "Code",
            "Hierarchy@odata.bind": "Dimensions('Region')/Hierarchies('Region')",
            "Elements@odata.bind": [
                "Dimensions('Region')/Hierarchies('Region')/Elements('North')",
                "Dimensions('Region')/Hierarchies('Region')/Elements('North')",
            ],
        })
    );
}

#[test]
fn test_empty_subset_body() {
    let subset = Subset::new("Empty", "Region", "Region").with_alias("");

    assert!(subset.is_static());
    assert_eq!(
        Value::Object(subset.body_as_map().unwrap()),
        json!({
            "Name": "Empty",
            "Hierarchy@odata.bind": "Dimensions('Region')/Hierarchies('Region')",
        })
    );
}

#[test]
fn test_subset_body_requires_back_pointers() {
    let mut subset = Subset::new_static("Top10", "", "", ["North"]);
    assert!(matches!(
        subset.body_as_map(),
        Err(BodyError::MissingBinding(MissingBindingError {
            entity: "subset",
            field: "dimension name",
            ..
        }))
    ));

    subset.dimension_name = "Region".to_string();
    assert!(matches!(
        subset.body(),
        Err(BodyError::MissingBinding(MissingBindingError {
            field: "hierarchy name",
            ..
        }))
    ));

    subset.hierarchy_name = "Region".to_string();
    assert!(subset.body().is_ok());
}

#[test]
fn test_subset_body_rejects_quotes_in_elements() {
    let subset = Subset::new_static("Airports", "Location", "Location", ["O'Hare"]);
    assert!(matches!(
        subset.body_as_map(),
        Err(BodyError::InvalidReference(_))
    ));
}

#[test]
fn test_subset_reference() {
    let subset = Subset::new("Top 10", "Region", "Region");
    assert_eq!(
        subset.reference().unwrap(),
        "Dimensions('Region')/Hierarchies('Region')/Subsets('Top%2010')"
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_static_dynamic_exclusivity() {
    let mut subset = Subset::new_static("S", "Region", "Region", ["North", "South"]);

    subset.set_expression("{[Region].[North]}");
    assert!(subset.is_dynamic());
    assert!(subset.elements().is_empty());
    assert_eq!(subset.expression(), Some("{[Region].[North]}"));

    subset.add_elements(["East"]);
    assert!(subset.is_static());
    assert_eq!(subset.expression(), None);
    assert_eq!(subset.elements(), ["East"]);

    subset.set_expression("");
    assert!(subset.is_static());
    assert!(subset.elements().is_empty());
}

#[test]
fn test_axis_body_static_flag() {
    let subset = Subset::new_static("S", "Region", "Region", ["North"]);

    let materialized = subset.axis_body_as_map(true).unwrap();
    assert!(materialized.contains_key("Elements@odata.bind"));

    let collapsed = subset.axis_body_as_map(false).unwrap();
    assert_eq!(
        Value::Object(collapsed),
        json!({
            "Name": "S",
            "Hierarchy@odata.bind": "Dimensions('Region')/Hierarchies('Region')",
        })
    );

    let dynamic = Subset::new_dynamic("D", "Region", "Region", "{[Region].Members}");
    assert_eq!(
        dynamic.axis_body_as_map(false).unwrap()["Expression"],
        json!("{[Region].Members}")
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_static_subset_body_decodes_back() {
    let original = Subset::new_static("Top10", "Region", "Alt Region", ["South West", "North"])
        .with_alias("Code");

    let decoded = Subset::from_value(&Value::Object(original.body_as_map().unwrap())).unwrap();

    assert_eq!(decoded, original);
    assert_eq!(decoded.dimension_name, "Region");
    assert_eq!(decoded.hierarchy_name, "Alt Region");
    assert_eq!(decoded.elements(), ["South West", "North"]);
    assert_eq!(decoded.expression(), None);
}

#[test]
fn test_dynamic_subset_body_decodes_back() {
    let original = Subset::new_dynamic(
        "Leaves",
        "Sales Region",
        "",
        "{TM1FILTERBYLEVEL({TM1SUBSETALL([Sales Region])},0)}",
    );

    let decoded = Subset::from_json(&original.body().unwrap()).unwrap();

    assert_eq!(decoded, original);
    assert_eq!(decoded.hierarchy_name, "Sales Region");
    assert!(decoded.is_dynamic());
}

#[test]
fn test_subset_decode_prefers_expanded_hierarchy() {
    let original = Subset::new_static("Top10", "Region", "Alt Region", ["South West", "North"]);

    // The server answers with expanded navigation properties next to the bindings
    let mut answer = Value::Object(original.body_as_map().unwrap());
    answer["Hierarchy"] = json!({ "Name": "Alt Region", "Dimension": { "Name": "Region" } });
    answer["Elements"] = json!([{ "Name": "South West" }, { "Name": "North" }, {}]);

    let decoded = Subset::from_value(&answer).unwrap();
    assert_eq!(decoded.dimension_name, "Region");
    assert_eq!(decoded.hierarchy_name, "Alt Region");
    assert_eq!(decoded.elements(), ["South West", "North", ""]);
}

#[test]
fn test_subset_decode_rejects_malformed_binding() {
    let result = Subset::from_value(&json!({
        "Name": "Top10",
        "Hierarchy@odata.bind": "Dimensions('Region')",
    }));
    assert!(matches!(result, Err(DecodeError::InvalidReference(_))));
}

#[test]
fn test_subset_decode_dynamic_ignores_elements() {
    let decoded = Subset::from_json(indoc!(
        r#"
        {
            "Name": "Leaves",
            "Expression": "{TM1FILTERBYLEVEL({TM1SUBSETALL([Region])},0)}",
            "Hierarchy": { "Name": "Region", "Dimension": { "Name": "Region" } },
            "Elements": [{ "Name": "North" }]
        }
        "#
    ))
    .unwrap();

    assert!(decoded.is_dynamic());
    assert!(decoded.elements().is_empty());
    assert_eq!(
        decoded.expression(),
        Some("{TM1FILTERBYLEVEL({TM1SUBSETALL([Region])},0)}")
    );
}

#[test_log::test]
fn test_subset_decode_from_unique_name() {
    let decoded = Subset::from_json(indoc!(
        r#"
        {
            "Name": "Top10",
            "UniqueName": "[Sales Region].[Sales Region].[Top10]",
            "Alias": null,
            "Elements": null
        }
        "#
    ))
    .unwrap();

    assert_eq!(decoded.dimension_name, "Sales Region");
    assert_eq!(decoded.hierarchy_name, "Sales Region");
    assert_eq!(decoded.alias, None);
    assert!(decoded.elements().is_empty());
}

#[test]
fn test_subset_decode_hierarchy_defaults_to_dimension() {
    let decoded = Subset::from_value(&json!({
        "Name": "S",
        "Hierarchy": { "Dimension": { "Name": "Time" } },
    }))
    .unwrap();

    assert_eq!(decoded.dimension_name, "Time");
    assert_eq!(decoded.hierarchy_name, "Time");
}

#[test]
fn test_subset_decode_malformed() {
    assert!(matches!(
        Subset::from_json("{\"Name\": "),
        Err(DecodeError::Json(_))
    ));
    assert!(matches!(
        Subset::from_value(&json!({ "Name": 42 })),
        Err(DecodeError::Json(_))
    ));
}
