use oxpath_actions::{
    ActionEngine, ActionExpression, BrowserSession, FieldType, LaunchOptions, PageModel, is_visible,
};
use serde_json::json;

const FORM: &str = r#"<html><body>
<form action="about:blank">
  <input type="text" id="q" name="q">
  <input type="checkbox" id="exact">
  <select id="colour"><option>Red</option><option>Green</option><option>Blue</option></select>
  <div style="display:none"><input type="text" id="trap"></div>
  <input type="submit" id="go">
</form>
</body></html>"#;

fn launch_with_form() -> BrowserSession {
    let session = BrowserSession::launch(LaunchOptions::new().headless(true)).expect("Failed to launch browser");
    session
        .navigate(&format!("data:text/html,{}", urlencoding::encode(FORM)))
        .expect("Failed to navigate");
    session.wait_for_navigation().expect("Navigation did not finish");
    session
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_classify_live_elements() {
    let session = launch_with_form();
    let page = session.page().expect("Failed to snapshot page");

    for (selector, expected) in [
        ("#q", FieldType::Text),
        ("#exact", FieldType::Checkbox),
        ("#colour", FieldType::Select),
        ("#go", FieldType::InputSubmit),
    ] {
        let node = page.find(selector).expect("Element not found");
        let field = FieldType::classify(page.dom().require(node).unwrap()).unwrap();
        assert_eq!(field, expected, "{}", selector);
    }
}

#[test]
#[ignore]
fn test_live_visibility() {
    let session = launch_with_form();
    let page = session.page().expect("Failed to snapshot page");

    let trap = page.find("#trap").unwrap();
    let query = page.find("#q").unwrap();

    assert!(!is_visible(page.dom().require(trap).unwrap()));
    assert!(is_visible(page.dom().require(query).unwrap()));
}

#[test]
#[ignore]
fn test_fill_and_submit() {
    let session = launch_with_form();
    let mut page = session.page().expect("Failed to snapshot page");
    let engine = ActionEngine::default();

    let query = page.find("#q").unwrap();
    engine
        .execute(&mut page, query, &ActionExpression::parse(r#""rust""#).unwrap())
        .expect("Failed to set value");

    let colour = page.find("#colour").unwrap();
    engine
        .execute(&mut page, colour, &ActionExpression::parse("2").unwrap())
        .expect("Failed to select");

    let value = page
        .tab()
        .evaluate("document.querySelector('#q').value + '|' + document.querySelector('#colour').value", false)
        .unwrap()
        .value;
    assert_eq!(value, Some(json!("rust|Green")));

    let go = page.find("#go").unwrap();
    let outcome = engine
        .execute(&mut page, go, &ActionExpression::parse("click").unwrap())
        .expect("Failed to submit");

    assert!(outcome.navigated());
    assert!(page.url().starts_with("about:blank"));
    assert!(page.find("#q").is_err());
}

#[test]
#[ignore]
fn test_take_action_tool() {
    let session = launch_with_form();

    let result = session
        .execute_tool("take_action", json!({ "selector": "#colour", "action": "{\"Blue\" @colour}" }))
        .expect("Tool failed");

    assert!(result.success);
    let data = result.data.unwrap();
    assert_eq!(data["field_type"], "select");
    assert_eq!(data["attribute"]["value"], "Blue");

    let result = session
        .execute_tool("check_visibility", json!({ "selector": "#trap" }))
        .expect("Tool failed");
    assert_eq!(result.data.unwrap()["visible"], false);
}
