#[cfg(test)]
mod tests {
    use crate::config::PresentationConfig;
    use crate::generator::planner::heuristics::{classify, detect_topic_list};
    use crate::generator::planner::{PagePlanDraft, PageSpec, PlanDecision, validate_draft};

    fn config() -> PresentationConfig {
        PresentationConfig::default()
    }

    fn expect_multi(decision: Option<PlanDecision>) -> crate::generator::planner::PagePlan {
        match decision {
            Some(PlanDecision::MultiPage(plan)) => plan,
            other => panic!("expected multi-page decision, got {:?}", other),
        }
    }

    #[test]
    fn test_short_query_is_single_page() {
        assert!(matches!(
            classify("safety data", &config()),
            Some(PlanDecision::SinglePage)
        ));
        assert!(matches!(
            classify("overall survival by subgroup", &config()),
            Some(PlanDecision::SinglePage)
        ));
    }

    #[test]
    fn test_explicit_page_count_with_matching_topics() {
        let plan = expect_multi(classify(
            "Create a 3-page presentation covering efficacy, safety, and demographics",
            &config(),
        ));

        assert_eq!(plan.total_pages, 3);
        assert_eq!(plan.pages.len(), 3);
        assert_eq!(plan.pages[0].topic_query, "efficacy");
        assert_eq!(plan.pages[1].topic_query, "safety");
        assert_eq!(plan.pages[2].topic_query, "demographics");
        assert_eq!(
            plan.pages.iter().map(|p| p.page_number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_explicit_page_count_without_topic_list() {
        let plan = expect_multi(classify(
            "Please build a 4-page presentation of the study results",
            &config(),
        ));

        assert_eq!(plan.total_pages, 4);
        for (i, page) in plan.pages.iter().enumerate() {
            assert_eq!(page.page_number, i + 1);
            assert!(page.topic_query.contains(&format!("part {} of 4", i + 1)));
        }
    }

    #[test]
    fn test_explicit_page_count_beats_short_query_rule() {
        // 两个词的查询，但显式页数优先
        let plan = expect_multi(classify("3-page deck", &config()));
        assert_eq!(plan.total_pages, 3);
    }

    #[test]
    fn test_explicit_page_count_is_capped() {
        let plan = expect_multi(classify(
            "Please produce a 25-page presentation of everything in the study",
            &config(),
        ));
        assert_eq!(plan.total_pages, config().max_pages_per_presentation);
    }

    #[test]
    fn test_one_page_request_is_single() {
        assert!(matches!(
            classify("Please make a 1-page summary of the efficacy results", &config()),
            Some(PlanDecision::SinglePage)
        ));
    }

    #[test]
    fn test_slides_pattern_is_recognized() {
        let plan = expect_multi(classify(
            "Please prepare 5 slides summarizing the trial outcomes",
            &config(),
        ));
        assert_eq!(plan.total_pages, 5);
    }

    #[test]
    fn test_topic_list_with_comprehensiveness_keyword() {
        let plan = expect_multi(classify(
            "Give a comprehensive overview covering efficacy, safety, demographics and dosing",
            &config(),
        ));

        assert_eq!(plan.total_pages, 4);
        assert_eq!(plan.pages[3].topic_query, "dosing");
    }

    #[test]
    fn test_topic_list_without_keyword_falls_through() {
        // 有主题列表但无综述性关键词，交由LLM分类
        assert!(classify(
            "Tell me something related to efficacy, safety, demographics and dosing",
            &config()
        )
        .is_none());
    }

    #[test]
    fn test_plain_long_query_falls_through() {
        assert!(classify(
            "How did the treatment arm compare against placebo over the study period",
            &config()
        )
        .is_none());
    }

    #[test]
    fn test_detect_topic_list_uses_lead_in() {
        let topics =
            detect_topic_list("An overview covering efficacy, safety, and demographics.");
        assert_eq!(topics, vec!["efficacy", "safety", "demographics"]);
    }

    #[test]
    fn test_detect_topic_list_without_lead_in() {
        let topics = detect_topic_list("efficacy, safety and dosing");
        assert_eq!(topics, vec!["efficacy", "safety", "dosing"]);
    }

    fn draft(is_multi_page: bool, total_pages: usize, pages: Vec<PageSpec>) -> PagePlanDraft {
        PagePlanDraft {
            is_multi_page,
            total_pages,
            theme: "theme".to_string(),
            reasoning: "reasoning".to_string(),
            pages,
        }
    }

    fn spec(number: usize, title: &str) -> PageSpec {
        PageSpec {
            page_number: number,
            title: title.to_string(),
            topic_query: format!("{} details", title),
        }
    }

    #[test]
    fn test_validate_draft_single_page() {
        let decision = validate_draft(draft(false, 1, vec![]), 10).unwrap();
        assert!(matches!(decision, PlanDecision::SinglePage));
    }

    #[test]
    fn test_validate_draft_reconciles_count_and_renumbers() {
        // total_pages与pages长度不一致，页码乱序
        let pages = vec![spec(7, "A"), spec(2, "B"), spec(9, "C")];
        let decision = validate_draft(draft(true, 5, pages), 10).unwrap();

        let plan = match decision {
            PlanDecision::MultiPage(plan) => plan,
            other => panic!("expected multi-page, got {:?}", other),
        };
        assert_eq!(plan.total_pages, 3);
        assert_eq!(
            plan.pages.iter().map(|p| p.page_number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_validate_draft_rejects_oversized_plan() {
        let pages = (1..=4).map(|i| spec(i, "T")).collect();
        assert!(validate_draft(draft(true, 4, pages), 3).is_err());
    }

    #[test]
    fn test_validate_draft_rejects_empty_titles() {
        let pages = vec![spec(1, "A"), spec(2, "")];
        assert!(validate_draft(draft(true, 2, pages), 10).is_err());
    }
}
