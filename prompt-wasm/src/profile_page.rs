use crate::api::ApiClient;
use crate::app::Route;
use prompt_shared::flow::{load_profile, send_toggle, ProfileLoad};
use prompt_shared::profile::{COMMENTS_PLACEHOLDER, LOADING, NO_EMAIL, NO_PROMPTS};
use prompt_shared::{Like, LikeToggle, ProfileState, ProfileTab, Prompt};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

const COMMUNITY_TOPICS: [&str; 3] = ["# 프롬프트 작성 꿀팁", "# GPT 추천 프롬프트", "# 가이드"];

pub enum Msg {
    RedirectToLogin,
    ProfileLoaded(ProfileState),
    SelectTab(ProfileTab),
    ToggleLike(String),
    LikeToggled(LikeToggle, String),
}

pub struct ProfilePage {
    profile: Option<ProfileState>,
    loading: bool,
    tab: ProfileTab,
    api: ApiClient,
}

impl Component for ProfilePage {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let api = ApiClient::new();
        let link = ctx.link().clone();
        let loader = api.clone();

        // Без сессии уходим на логин, не запрашивая данные
        spawn_local(async move {
            match load_profile(&loader).await {
                ProfileLoad::RedirectToLogin => link.send_message(Msg::RedirectToLogin),
                ProfileLoad::Ready(profile) => link.send_message(Msg::ProfileLoaded(profile)),
            }
        });

        Self {
            profile: None,
            loading: true,
            tab: ProfileTab::default(),
            api,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::RedirectToLogin => {
                if let Some(navigator) = ctx.link().navigator() {
                    navigator.push(&Route::Login);
                }
                false
            }

            Msg::ProfileLoaded(profile) => {
                self.profile = Some(profile);
                self.loading = false;
                true
            }

            Msg::SelectTab(tab) => {
                self.tab = tab;
                true
            }

            Msg::ToggleLike(prompt_id) => {
                let Some(profile) = &self.profile else {
                    return false;
                };

                let toggle = profile.next_toggle(&prompt_id);
                let like = Like::new(profile.user().id.clone(), prompt_id);
                let api = self.api.clone();
                let link = ctx.link().clone();

                // Локальный счётчик меняется только после ответа бэкенда, без отката
                spawn_local(async move {
                    send_toggle(&api, &like, toggle).await;
                    link.send_message(Msg::LikeToggled(toggle, like.prompt_id));
                });

                false
            }

            Msg::LikeToggled(toggle, prompt_id) => match &mut self.profile {
                Some(profile) => {
                    profile.apply(toggle, &prompt_id);
                    true
                }
                None => false,
            },
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let email = self
            .profile
            .as_ref()
            .map(|p| p.email_label().to_string())
            .unwrap_or_else(|| NO_EMAIL.to_string());

        html! {
            <div class="profile-layout">
                <aside class="sidebar">
                    <div class="avatar" />
                    <h2>{ "내 프로필" }</h2>
                    <p class="email">{ email }</p>
                    <div class="tools">
                        <h3>{ "Tools & Visualizations" }</h3>
                        <div class="tools-placeholder" />
                    </div>
                </aside>

                <main class="profile-main">
                    <div class="tabs">
                        { self.view_tab(ProfileTab::Prompts, ctx) }
                        { self.view_tab(ProfileTab::Comments, ctx) }
                    </div>
                    {
                        match self.tab {
                            ProfileTab::Prompts => self.view_prompts(ctx),
                            ProfileTab::Comments => html! {
                                <p class="muted">{ COMMENTS_PLACEHOLDER }</p>
                            },
                        }
                    }
                </main>

                <aside class="community">
                    <h3>{ "Community" }</h3>
                    <input type="text" placeholder="Search posts" />
                    { for COMMUNITY_TOPICS.iter().map(|topic| html! { <p>{ *topic }</p> }) }
                </aside>
            </div>
        }
    }
}

impl ProfilePage {
    fn view_tab(&self, tab: ProfileTab, ctx: &Context<Self>) -> Html {
        let class = if self.tab == tab { "tab active" } else { "tab" };
        html! {
            <button class={class} onclick={ctx.link().callback(move |_| Msg::SelectTab(tab))}>
                { tab.label() }
            </button>
        }
    }

    fn view_prompts(&self, ctx: &Context<Self>) -> Html {
        if self.loading {
            return html! { <p class="muted">{ LOADING }</p> };
        }

        match &self.profile {
            Some(profile) if !profile.prompts().is_empty() => html! {
                <div class="prompt-list">
                    { for profile.prompts().iter().map(|p| self.view_prompt(p, profile.is_liked(&p.id), ctx)) }
                </div>
            },
            _ => html! { <p class="muted">{ NO_PROMPTS }</p> },
        }
    }

    fn view_prompt(&self, prompt: &Prompt, liked: bool, ctx: &Context<Self>) -> Html {
        let prompt_id = prompt.id.clone();
        let on_toggle = ctx
            .link()
            .callback(move |_| Msg::ToggleLike(prompt_id.clone()));
        let class = if liked { "btn btn-default" } else { "btn btn-ghost" };

        html! {
            <div class="card prompt" key={prompt.id.clone()}>
                <div class="thumbnail" />
                <div class="prompt-body">
                    <h4>{ &prompt.title }</h4>
                    <p class="prompt-description">{ &prompt.description }</p>
                    <button class={class} onclick={on_toggle}>
                        { format!("★ {}", prompt.likes) }
                    </button>
                </div>
            </div>
        }
    }
}
