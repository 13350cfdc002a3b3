use crate::api::ApiClient;
use crate::feed_page::FeedPage;
use crate::login_page::LoginPage;
use crate::profile_page::ProfilePage;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Debug, Clone, PartialEq, Routable)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/feed")]
    Feed,
    #[at("/profile")]
    Profile,
    #[at("/login")]
    Login,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(route: Route) -> Html {
    match route {
        Route::Home | Route::Feed => html! { <FeedPage /> },
        Route::Profile => html! { <ProfilePage /> },
        Route::Login => html! { <LoginPage /> },
        Route::NotFound => html! {
            <div class="container">
                <p>{ "페이지를 찾을 수 없습니다." }</p>
            </div>
        },
    }
}

#[function_component(Nav)]
fn nav() -> Html {
    let navigator = use_navigator();
    let logout = Callback::from(move |_: MouseEvent| {
        let navigator = navigator.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = ApiClient::new().sign_out().await {
                log::warn!("Logout failed: {}", e);
            }
            if let Some(navigator) = navigator {
                navigator.push(&Route::Login);
            }
        });
    });

    html! {
        <nav class="nav">
            <Link<Route> to={Route::Feed}>{ "피드" }</Link<Route>>
            <Link<Route> to={Route::Profile}>{ "내 프로필" }</Link<Route>>
            <button class="btn btn-ghost" onclick={logout}>{ "로그아웃" }</button>
        </nav>
    }
}

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <BrowserRouter>
            <Nav />
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}
