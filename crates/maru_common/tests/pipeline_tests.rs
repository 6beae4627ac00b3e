//! End-to-end routing tests with a scripted reasoning service

use maru_common::llm_client::{ServiceReply, ToolCall};
use maru_common::{
    builtin_registry, Arguments, Catalog, Decision, DispatchError, Dispatcher, ErrorKind,
    IntentRouter, LlmError, Registry, RouteOutcome, ScriptedClient,
};
use serde_json::json;
use std::sync::Arc;

fn registry() -> Arc<Registry> {
    Arc::new(builtin_registry(Arc::new(Catalog::builtin())).unwrap())
}

fn router(client: ScriptedClient) -> IntentRouter<ScriptedClient> {
    IntentRouter::new(client, "사용자의 요청을 분석하여 적절한 함수를 호출하세요.", registry())
}

fn executed(outcome: RouteOutcome) -> (Decision, Result<String, DispatchError>) {
    match outcome {
        RouteOutcome::Executed { decision, result } => (decision, result),
        other => panic!("expected an executed decision, got {:?}", other),
    }
}

#[test]
fn test_lookup_returns_registered_specs() {
    let registry = registry();
    let specs: Vec<_> = registry.describe_all().cloned().collect();
    assert_eq!(specs.len(), 5);
    for spec in &specs {
        assert_eq!(&registry.lookup(&spec.name).unwrap().spec, spec);
    }
}

#[test]
fn test_weather_route() {
    let router = router(ScriptedClient::calling("get_weather", json!({"location": "서울"})));
    let (decision, result) = executed(router.handle("서울의 날씨 어때?"));
    assert_eq!(decision.operation, "get_weather");
    assert_eq!(result.unwrap(), "맑음, 22°C");
}

#[test]
fn test_weather_unknown_city_is_not_an_error() {
    let router = router(ScriptedClient::calling("get_weather", json!({"location": "Atlantis"})));
    let (_, result) = executed(router.handle("아틀란티스 날씨"));
    assert_eq!(result.unwrap(), "Atlantis의 날씨 정보를 찾을 수 없습니다.");
}

#[test]
fn test_calculator_routes() {
    let adding = router(ScriptedClient::calling(
        "calculator",
        json!({"operation": "더하기", "a": 10, "b": 20}),
    ));
    let (_, result) = executed(adding.handle("10과 20 더하기 계산해줘"));
    assert!(result.unwrap().contains("30"));

    let dividing = router(ScriptedClient::calling(
        "calculator",
        json!({"operation": "나누기", "a": 5, "b": 0}),
    ));
    let (_, result) = executed(dividing.handle("5를 0으로 나눠줘"));
    assert_eq!(result.unwrap(), "0으로 나눌 수 없습니다.");
}

#[test]
fn test_calculator_string_numbers_are_coerced() {
    let router = router(ScriptedClient::calling(
        "calculator",
        json!({"operation": "곱하기", "a": "3", "b": "4"}),
    ));
    let (decision, result) = executed(router.handle("3 곱하기 4"));
    assert_eq!(result.unwrap(), "3 * 4 = 12");
    assert_eq!(decision.provenance.raw_arguments, r#"{"a":"3","b":"4","operation":"곱하기"}"#);
}

#[test]
fn test_translate_schedule_and_movie() {
    let cases = [
        (
            "translate",
            json!({"text": "안녕하세요", "target_language": "일본어"}),
            "こんにちは",
        ),
        (
            "add_schedule",
            json!({"date": "2023-04-15", "event": "팀 미팅"}),
            "일정이 추가되었습니다: 2023-04-15에 팀 미팅",
        ),
        (
            "recommend_movie",
            json!({"genre": "액션"}),
            "액션 장르 추천 영화: 다이 하드, 매드 맥스: 분노의 도로, 존 윅",
        ),
    ];

    for (name, args, expected) in cases {
        let router = router(ScriptedClient::calling(name, args));
        let (_, result) = executed(router.handle("instruction"));
        assert_eq!(result.unwrap(), expected, "operation {}", name);
    }
}

#[test]
fn test_no_decision_is_distinct_from_failure() {
    let router = router(ScriptedClient::always(ServiceReply::text("무슨 뜻인가요?")));
    let outcome = router.handle("asdfgh");
    assert_eq!(outcome, RouteOutcome::NoDecision);
    assert!(!outcome.is_success());
}

#[test]
fn test_service_failure_does_not_panic() {
    let router = router(ScriptedClient::always_error(LlmError::Http(
        "connection refused".to_string(),
    )));
    match router.handle("서울 날씨") {
        RouteOutcome::DecisionFailed(err) => assert_eq!(err.kind(), ErrorKind::DecisionService),
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn test_malformed_arguments_reported() {
    let reply = ServiceReply::calls(vec![ToolCall::new("get_weather", "{location: 서울}")]);
    let router = router(ScriptedClient::always(reply));
    match router.handle("서울 날씨") {
        RouteOutcome::DecisionFailed(err) => assert_eq!(err.kind(), ErrorKind::MalformedArguments),
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn test_unknown_operation_from_service() {
    let router = router(ScriptedClient::calling("get_stock_price", json!({"ticker": "AAPL"})));
    let (_, result) = executed(router.handle("애플 주가"));
    assert_eq!(
        result.unwrap_err(),
        DispatchError::UnknownOperation("get_stock_price".to_string())
    );
}

#[test]
fn test_validation_failures_name_the_parameter() {
    let cases = [
        (json!({"operation": "더하기", "a": 1}), ErrorKind::MissingArgument, "b"),
        (json!({"operation": "더하기", "a": true, "b": 2}), ErrorKind::TypeMismatch, "a"),
        (json!({"operation": "제곱", "a": 1, "b": 2}), ErrorKind::InvalidEnumValue, "operation"),
        (
            json!({"operation": "더하기", "a": 1, "b": 2, "c": 3}),
            ErrorKind::UnexpectedArgument,
            "c",
        ),
    ];

    for (args, kind, parameter) in cases {
        let router = router(ScriptedClient::calling("calculator", args.clone()));
        let (_, result) = executed(router.handle("계산"));
        let err = result.unwrap_err();
        assert_eq!(err.kind(), kind, "arguments {}", args);
        assert_eq!(err.parameter(), Some(parameter), "arguments {}", args);
    }
}

#[test]
fn test_first_candidate_wins() {
    let reply = ServiceReply::calls(vec![
        ToolCall::new("recommend_movie", r#"{"genre":"SF"}"#),
        ToolCall::new("get_weather", r#"{"location":"서울"}"#),
    ]);
    let router = router(ScriptedClient::always(reply));
    let (decision, result) = executed(router.handle("SF 영화 추천하고 서울 날씨도 알려줘"));
    assert_eq!(decision.operation, "recommend_movie");
    assert_eq!(decision.provenance.candidates, 2);
    assert!(result.unwrap().starts_with("SF 장르 추천 영화"));
}

#[test]
fn test_one_service_call_per_instruction() {
    let router = router(ScriptedClient::calling("get_weather", json!({"location": "부산"})));
    router.handle("부산 날씨");
    router.handle("부산 날씨 다시");
    assert_eq!(router.requester().client().call_count(), 2);

    let requests = router.requester().client().requests();
    let request = &requests[0];
    assert_eq!(request.instruction, "부산 날씨");
    assert_eq!(request.declarations.len(), 5);
    assert_eq!(request.declarations[0]["function"]["name"], "get_weather");
    assert_eq!(
        request.declarations[4]["function"]["parameters"]["properties"]["genre"]["enum"],
        json!(["액션", "코미디", "로맨스", "SF", "공포"])
    );
}

#[test]
fn test_pure_operations_are_idempotent() {
    let dispatcher = Dispatcher::new(registry());
    let decisions = [
        Decision::new("get_weather", Arguments::new().with("location", "제주")),
        Decision::new(
            "translate",
            Arguments::new()
                .with("text", "감사합니다")
                .with("target_language", "영어"),
        ),
        Decision::new("recommend_movie", Arguments::new().with("genre", "공포")),
    ];

    for decision in &decisions {
        let first = dispatcher.execute(decision);
        let second = dispatcher.execute(decision);
        assert!(first.is_ok());
        assert_eq!(first, second);
    }
}

#[test]
fn test_custom_catalog_changes_enumerations() {
    let catalog = Catalog::from_toml(
        r#"
[[movies]]
genre = "다큐멘터리"
titles = ["프리 솔로"]
"#,
    )
    .unwrap();
    let registry = Arc::new(builtin_registry(Arc::new(catalog)).unwrap());
    let router = IntentRouter::new(
        ScriptedClient::calling("recommend_movie", json!({"genre": "다큐멘터리"})),
        "",
        registry,
    );
    let (_, result) = executed(router.handle("다큐 추천"));
    assert_eq!(result.unwrap(), "다큐멘터리 장르 추천 영화: 프리 솔로");
}
