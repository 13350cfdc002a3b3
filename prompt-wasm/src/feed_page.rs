use crate::api::ApiClient;
use prompt_shared::feed::{excerpt, EMPTY_RESULT, SEARCH_PLACEHOLDER};
use prompt_shared::flow::fetch_feed;
use prompt_shared::{Category, FeedState, Prompt};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

pub enum Msg {
    PromptsLoaded(Vec<Prompt>),
    UpdateSearch(String),
    SelectCategory(String),
}

pub struct FeedPage {
    feed: FeedState,
}

impl Component for FeedPage {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let api = ApiClient::new();
        let link = ctx.link().clone();

        // Ошибка загрузки не показывается: лента просто остаётся пустой
        spawn_local(async move {
            let prompts = fetch_feed(&api).await;
            link.send_message(Msg::PromptsLoaded(prompts));
        });

        Self {
            feed: FeedState::default(),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::PromptsLoaded(prompts) => self.feed.replace_prompts(prompts),
            Msg::UpdateSearch(search) => self.feed.set_search(search),
            Msg::SelectCategory(label) => {
                self.feed.set_category(label.parse().unwrap_or_default());
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let filtered = self.feed.filtered();

        let on_search = ctx.link().callback(|e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::UpdateSearch(input.value())
        });
        let on_category = ctx.link().callback(|e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            Msg::SelectCategory(select.value())
        });

        html! {
            <div class="container feed">
                <h1>{ "🚀 최신 프롬프트 피드" }</h1>

                <div class="feed-filters">
                    <input
                        type="text"
                        class="search"
                        placeholder={SEARCH_PLACEHOLDER}
                        value={self.feed.search().to_string()}
                        oninput={on_search}
                    />
                    <select class="category" onchange={on_category}>
                        { for Category::ALL.iter().map(|c| self.view_option(*c)) }
                    </select>
                </div>

                <div class="prompt-list">
                    { for filtered.iter().map(|prompt| view_card(prompt)) }

                    if filtered.is_empty() {
                        <p class="empty">{ EMPTY_RESULT }</p>
                    }
                </div>
            </div>
        }
    }
}

impl FeedPage {
    fn view_option(&self, category: Category) -> Html {
        html! {
            <option value={category.label()} selected={category == self.feed.category()}>
                { category.label() }
            </option>
        }
    }
}

fn view_card(prompt: &Prompt) -> Html {
    html! {
        <div class="card" key={prompt.id.clone()}>
            <a class="prompt-title" href={format!("/prompts/{}", prompt.id)}>
                { &prompt.title }
            </a>
            <p class="prompt-description">{ excerpt(&prompt.description) }</p>
            <div class="prompt-meta">
                { format!("카테고리: {} • 조회수: {}", prompt.category, prompt.views) }
            </div>
        </div>
    }
}
