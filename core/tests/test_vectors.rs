//! Verify request building against the JSON vectors in `test-vectors/`.
//!
//! Each case names the headers configured on the client, the call inputs,
//! and either the request the client must produce or the error it must
//! return. Building never touches the network, so the default client is used.

use std::collections::BTreeMap;

use simple_http::{Body, Client, ClientError, FormData, Method, Request};

fn build(client: &Client, case: &serde_json::Value) -> Result<Request, ClientError> {
    if let Some(form) = case.get("form") {
        let form: FormData = serde_json::from_value(form.clone()).unwrap();
        return client.build_form_request(case["url"].as_str().unwrap(), &form);
    }
    let method: Method = case["method"].as_str().unwrap().parse()?;
    let body = Body::from(case.get("body").and_then(|b| b.as_str()));
    client.build_request(method, case["url"].as_str().unwrap(), body)
}

#[test]
fn build_test_vectors() {
    let raw = include_str!("../../test-vectors/build.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let headers: BTreeMap<String, String> = serde_json::from_value(case["headers"].clone()).unwrap();

        let mut client = Client::new();
        client.add_headers(&headers);
        let result = build(&client, case);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error.as_str().unwrap() {
                "InvalidRequest" => {
                    assert!(matches!(err, ClientError::InvalidRequest(_)), "{name}: got {err:?}")
                }
                other => panic!("{name}: unknown expected_error: {other}"),
            }
            continue;
        }

        let req = result.unwrap_or_else(|e| panic!("{name}: {e}"));
        let expected = &case["expected_request"];
        assert_eq!(req.method.as_str(), expected["method"].as_str().unwrap(), "{name}: method");
        assert_eq!(req.url.as_str(), expected["url"].as_str().unwrap(), "{name}: url");

        let expected_headers: Vec<(String, String)> =
            serde_json::from_value(expected["headers"].clone()).unwrap();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        let expected_body = expected["body"].as_str().map(|b| b.as_bytes().to_vec());
        assert_eq!(req.body, expected_body, "{name}: body");
    }
}
