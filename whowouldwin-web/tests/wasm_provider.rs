#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;
use whowouldwin_game::{CharacterProvider, GroupId, ProviderError};
use whowouldwin_web::dom;
use whowouldwin_web::provider::JikanProvider;

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
async fn sleep_resolves() {
    dom::sleep_ms(5).await.expect("timer");
}

#[wasm_bindgen_test]
async fn unreachable_host_fails_within_timeout() {
    let provider = JikanProvider::new("https://10.255.255.1/v4", 50);
    let result = provider.roster(GroupId(5114)).await;
    assert!(matches!(
        result,
        Err(ProviderError::Timeout(50) | ProviderError::Network(_))
    ));
}
